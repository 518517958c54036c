//! Field contract and plain value fields
//!
//! A field maps one named attribute between a source object and a primitive
//! value. Fields are declared once on a [`SerializerClass`](crate::SerializerClass)
//! and copied into every serializer instance; the copy is bound to its owning
//! serializer by [`Field::initialize`] before it converts anything.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use graphcast_types::{
	ConfigurationError, ConversionResult, FieldKind, FieldMeta, Primitive, PrimitiveMap, Scalar,
	Sequence,
};

use crate::context::Traversal;
use crate::model::ModelField;
use crate::reverted::{Attributes, Reverted};
use crate::serializer::Serializer;
use crate::source::Source;

static CREATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Owner information recorded when a field is initialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
	/// Name of the owning serializer class
	pub parent: String,
	/// Model attribute the field corresponds to, if any
	pub model_field: Option<ModelField>,
}

/// State shared by every field implementation.
///
/// # Examples
///
/// ```
/// use graphcast_core::FieldCore;
///
/// let first = FieldCore::new();
/// let second = FieldCore::new().with_label("Title");
///
/// assert!(first.creation_counter() < second.creation_counter());
/// assert_eq!(second.label(), Some("Title"));
/// assert!(second.binding().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FieldCore {
	label: Option<String>,
	creation_counter: u64,
	binding: Option<Binding>,
}

impl FieldCore {
	/// Take the next declaration-order index
	pub fn new() -> Self {
		Self {
			label: None,
			creation_counter: CREATION_COUNTER.fetch_add(1, Ordering::Relaxed),
			binding: None,
		}
	}

	/// Set the output key used instead of the field name
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Output key override
	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	/// Declaration-order index
	pub fn creation_counter(&self) -> u64 {
		self.creation_counter
	}

	/// Owner information, once initialised
	pub fn binding(&self) -> Option<&Binding> {
		self.binding.as_ref()
	}

	/// Record the owner. A field is bound once; later calls keep the first owner.
	pub fn bind(&mut self, binding: Binding) {
		if self.binding.is_none() {
			self.binding = Some(binding);
		}
	}

	/// Owner information, or the configuration fault for an unbound field
	pub fn require_binding(&self, field_name: &str) -> ConversionResult<&Binding> {
		self.binding
			.as_ref()
			.ok_or_else(|| ConfigurationError::UnboundField {
				field: field_name.to_string(),
			})
	}
}

impl Default for FieldCore {
	fn default() -> Self {
		Self::new()
	}
}

/// Leaf conversion unit.
pub trait Field: fmt::Debug + Send + Sync {
	/// Shared field state
	fn core(&self) -> &FieldCore;

	/// Shared field state, mutable
	fn core_mut(&mut self) -> &mut FieldCore;

	/// Bind the field to its owning serializer
	fn initialize(&mut self, parent: &Serializer, model_field: Option<ModelField>) {
		self.core_mut().bind(Binding {
			parent: parent.class().name().to_string(),
			model_field,
		});
	}

	/// Convert the attribute `field_name` of `obj`
	fn field_to_native(
		&self,
		obj: &Source,
		field_name: &str,
		cx: &mut Traversal,
	) -> ConversionResult<Primitive>;

	/// Take this field's value out of `data` and store its reconstruction in `into`
	fn field_from_native(
		&self,
		data: &mut PrimitiveMap,
		field_name: &str,
		into: &mut Attributes,
		cx: &mut Traversal,
	) -> ConversionResult<()>;

	/// What kind of value the field produces
	fn kind(&self) -> FieldKind {
		FieldKind::Value
	}

	/// Downcast to a nested serializer
	fn as_serializer(&self) -> Option<&Serializer> {
		None
	}

	/// Downcast to a nested serializer, mutable
	fn as_serializer_mut(&mut self) -> Option<&mut Serializer> {
		None
	}

	/// Copy the field into a new box
	fn clone_box(&self) -> Box<dyn Field>;

	/// Output key override
	fn label(&self) -> Option<&str> {
		self.core().label()
	}

	/// Key the field writes to and reads from
	fn output_key<'a>(&'a self, field_name: &'a str) -> &'a str {
		self.label().unwrap_or(field_name)
	}

	/// Metadata recorded next to the produced mapping entry
	fn metadata(&self, field_name: &str) -> FieldMeta {
		let meta = FieldMeta::new(field_name, self.kind());
		match self.core().binding().and_then(|b| b.model_field.as_ref()) {
			Some(model_field) => meta.with_model_field(model_field.name.clone()),
			None => meta,
		}
	}
}

impl Clone for Box<dyn Field> {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

/// Read the attribute a bound field points at; absent attributes are null.
pub fn extract(obj: &Source, field_name: &str, binding: &Binding) -> Source {
	let attribute = binding
		.model_field
		.as_ref()
		.map_or(field_name, |model_field| model_field.name.as_str());
	obj.get(attribute).unwrap_or_else(Source::null)
}

/// Flat conversion used by plain fields.
///
/// Objects are not walked: they collapse to their display string, so the
/// result never recurses into the object graph.
pub fn flat_to_native(value: Source) -> Primitive {
	match value {
		Source::Scalar(scalar) => Primitive::Scalar(scalar),
		Source::Accessor(accessor) => flat_to_native(accessor.call()),
		Source::Mapping(map) => {
			let mut out = PrimitiveMap::new();
			for (key, value) in map {
				out.insert(key, flat_to_native(value));
			}
			Primitive::Mapping(out)
		}
		Source::Sequence(items) => Primitive::Sequence(Sequence::from_values(
			items.into_iter().map(flat_to_native).collect::<Vec<_>>(),
		)),
		Source::Object(obj) => Primitive::Scalar(Scalar::String(obj.display())),
	}
}

/// Plain attribute field.
///
/// # Examples
///
/// ```
/// use graphcast_core::{DynamicObject, Field, Serializer, SerializerClass, Source, Traversal, ValueField};
///
/// let class = SerializerClass::builder("Doc").build();
/// let owner = Serializer::new(&class);
///
/// let mut field = ValueField::new();
/// field.initialize(&owner, None);
///
/// let obj = Source::from(DynamicObject::new("Doc").with("title", "Hi").shared());
/// let value = field.field_to_native(&obj, "title", &mut Traversal::new()).unwrap();
/// assert_eq!(value.into_json().unwrap(), serde_json::json!("Hi"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValueField {
	core: FieldCore,
}

impl ValueField {
	/// Create an unbound field
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the output key
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.core = self.core.with_label(label);
		self
	}
}

impl Field for ValueField {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn field_to_native(
		&self,
		obj: &Source,
		field_name: &str,
		_cx: &mut Traversal,
	) -> ConversionResult<Primitive> {
		let binding = self.core.require_binding(field_name)?;
		Ok(flat_to_native(extract(obj, field_name, binding)))
	}

	fn field_from_native(
		&self,
		data: &mut PrimitiveMap,
		field_name: &str,
		into: &mut Attributes,
		_cx: &mut Traversal,
	) -> ConversionResult<()> {
		self.core.require_binding(field_name)?;
		let value = data
			.take(self.output_key(field_name))
			.unwrap_or_else(Primitive::null);
		into.insert(field_name.to_string(), Reverted::from_primitive(value));
		Ok(())
	}

	fn clone_box(&self) -> Box<dyn Field> {
		Box::new(self.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fieldset::SerializerClass;
	use crate::source::{Accessor, DynamicObject};
	use rstest::rstest;
	use serde_json::json;

	fn bound(field: ValueField) -> ValueField {
		let owner = Serializer::new(&SerializerClass::builder("Owner").build());
		let mut field = field;
		field.initialize(&owner, None);
		field
	}

	#[rstest]
	fn test_unbound_field_is_configuration_fault() {
		let obj = Source::from(DynamicObject::new("Doc").with("title", "Hi").shared());
		let err = ValueField::new()
			.field_to_native(&obj, "title", &mut Traversal::new())
			.unwrap_err();
		assert_eq!(
			err,
			ConfigurationError::UnboundField {
				field: "title".to_string()
			}
		);
	}

	#[rstest]
	fn test_binding_is_set_once() {
		let first = Serializer::new(&SerializerClass::builder("First").build());
		let second = Serializer::new(&SerializerClass::builder("Second").build());

		let mut field = ValueField::new();
		field.initialize(&first, None);
		field.initialize(&second, None);
		assert_eq!(field.core().binding().unwrap().parent, "First");
	}

	#[rstest]
	fn test_flat_conversion_shapes() {
		let author = DynamicObject::new("User").with_display("alice").shared();
		let obj = Source::from(
			DynamicObject::new("Post")
				.with("author", author)
				.with("tags", vec![Source::from("x"), Source::from("y")])
				.with("score", Accessor::new(|| Source::from(7)))
				.shared(),
		);
		let field = bound(ValueField::new());
		let mut cx = Traversal::new();

		let author = field.field_to_native(&obj, "author", &mut cx).unwrap();
		let tags = field.field_to_native(&obj, "tags", &mut cx).unwrap();
		let score = field.field_to_native(&obj, "score", &mut cx).unwrap();
		let missing = field.field_to_native(&obj, "missing", &mut cx).unwrap();

		assert_eq!(author.into_json().unwrap(), json!("alice"));
		assert_eq!(tags.into_json().unwrap(), json!(["x", "y"]));
		assert_eq!(score.into_json().unwrap(), json!(7));
		assert!(missing.is_null());
	}

	#[rstest]
	fn test_from_native_reads_label_and_tolerates_missing() {
		let field = bound(ValueField::new().with_label("Title"));
		let mut data = PrimitiveMap::new();
		data.insert("Title", Scalar::from("Hi"));
		let mut into = Attributes::new();
		let mut cx = Traversal::new();

		field
			.field_from_native(&mut data, "title", &mut into, &mut cx)
			.unwrap();
		assert_eq!(into["title"].as_scalar(), Some(&Scalar::from("Hi")));
		assert!(data.is_empty());

		field
			.field_from_native(&mut data, "title", &mut into, &mut cx)
			.unwrap();
		assert!(into["title"].as_scalar().unwrap().is_null());
	}

	#[rstest]
	fn test_metadata_records_model_field() {
		let owner = Serializer::new(&SerializerClass::builder("Owner").build());
		let mut field = ValueField::new();
		field.initialize(&owner, Some(ModelField::new("title")));

		let meta = field.metadata("heading");
		assert_eq!(meta.field_name, "heading");
		assert_eq!(meta.kind, FieldKind::Value);
		assert_eq!(meta.model_field.as_deref(), Some("title"));
	}
}
