//! Serializer and graph walker
//!
//! A [`Serializer`] resolves the field set that applies to an object and
//! walks the object graph in both directions:
//!
//! - `to_native`: source graph to primitive tree, with path-sensitive cycle
//!   detection and a nesting budget that shrinks across nested serializers
//! - `from_native`: primitive tree to a flat attribute mapping, handed to the
//!   behaviour's `create_object`
//!
//! A serializer is itself a [`Field`], so serializers nest. Traversal state
//! lives in a [`Traversal`] created per top-level call, which makes a single
//! instance safe to reuse.

use std::fmt;
use std::io::{Read, Write};
use std::rc::Rc;
use std::sync::Arc;

use graphcast_formats::RenderOptions;
use graphcast_types::{
	ConfigurationError, ConversionResult, FieldKind, Primitive, PrimitiveMap, Scalar, Sequence,
};
use tracing::{debug, trace};

use crate::context::Traversal;
use crate::error::{SerializerError, SerializerResult};
use crate::fields::{Binding, Field, FieldCore, ValueField, extract};
use crate::fieldset::{FieldSet, SerializerClass};
use crate::model::{ModelField, ModelMeta, resolve_pk};
use crate::options::{Meta, Nested, Options};
use crate::reverted::{Attributes, Reverted, RevertedSequence};
use crate::source::{ObjectRef, Source};

/// Format identifier of the pass-through format: the primitive tree itself
/// is the result and no renderer or parser is involved.
pub const STRUCTURED_VALUE: &str = "structured-value";

/// Per-call overrides for [`Serializer::serialize`].
///
/// `fields`, `exclude` and `nested` go to the first root field when the
/// serializer has one, otherwise to the serializer itself.
///
/// # Examples
///
/// ```
/// use graphcast_core::{Nested, SerializeOptions};
///
/// let options = SerializeOptions::new().with_fields(["name"]).with_nested(Nested::Depth(2)).with_indent(4);
/// assert_eq!(options.fields, Some(vec!["name".to_string()]));
/// assert_eq!(options.nested, Some(Nested::Depth(2)));
/// assert_eq!(options.render.indent, Some(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
	/// Allowlist override
	pub fields: Option<Vec<String>>,
	/// Exclusion override
	pub exclude: Option<Vec<String>>,
	/// Nesting policy override
	pub nested: Option<Nested>,
	/// Options handed to the renderer
	pub render: RenderOptions,
}

impl SerializeOptions {
	/// No overrides
	pub fn new() -> Self {
		Self::default()
	}

	/// Override the allowlist
	pub fn with_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Override the exclusion list
	pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.exclude = Some(exclude.into_iter().map(Into::into).collect());
		self
	}

	/// Override the nesting policy
	pub fn with_nested(mut self, nested: impl Into<Nested>) -> Self {
		self.nested = Some(nested.into());
		self
	}

	/// Pretty-print where the format supports it
	pub fn with_indent(mut self, indent: usize) -> Self {
		self.render = self.render.with_indent(indent);
		self
	}
}

/// Result of [`Serializer::serialize`].
#[derive(Debug)]
pub enum Serialized {
	/// Primitive tree, for the pass-through format
	Native(Primitive),
	/// Encoded bytes, for every other format
	Rendered(Vec<u8>),
}

impl Serialized {
	/// Take the primitive tree
	pub fn into_native(self) -> Option<Primitive> {
		match self {
			Serialized::Native(data) => Some(data),
			Serialized::Rendered(_) => None,
		}
	}

	/// Take the encoded bytes
	pub fn into_bytes(self) -> Option<Vec<u8>> {
		match self {
			Serialized::Native(_) => None,
			Serialized::Rendered(bytes) => Some(bytes),
		}
	}

	/// Encoded bytes as text, when they are valid UTF-8
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Serialized::Native(_) => None,
			Serialized::Rendered(bytes) => std::str::from_utf8(bytes).ok(),
		}
	}
}

/// Input of [`Serializer::deserialize`].
pub enum Payload<'a> {
	/// Already decoded primitive tree, for the pass-through format
	Native(Primitive),
	/// Encoded bytes
	Bytes(&'a [u8]),
	/// Stream of encoded bytes
	Reader(&'a mut dyn Read),
}

impl<'a> Payload<'a> {
	/// Wrap a reader
	pub fn reader(reader: &'a mut dyn Read) -> Self {
		Payload::Reader(reader)
	}

	fn kind(&self) -> &'static str {
		match self {
			Payload::Native(_) => "primitive tree",
			Payload::Bytes(_) => "byte",
			Payload::Reader(_) => "stream",
		}
	}
}

impl From<Primitive> for Payload<'_> {
	fn from(data: Primitive) -> Self {
		Payload::Native(data)
	}
}

impl<'a> From<&'a [u8]> for Payload<'a> {
	fn from(bytes: &'a [u8]) -> Self {
		Payload::Bytes(bytes)
	}
}

impl<'a> From<&'a Vec<u8>> for Payload<'a> {
	fn from(bytes: &'a Vec<u8>) -> Self {
		Payload::Bytes(bytes)
	}
}

impl<'a> From<&'a str> for Payload<'a> {
	fn from(text: &'a str) -> Self {
		Payload::Bytes(text.as_bytes())
	}
}

impl fmt::Debug for Payload<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Payload::Native(data) => f.debug_tuple("Native").field(data).finish(),
			Payload::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
			Payload::Reader(_) => f.write_str("Reader(..)"),
		}
	}
}

/// Serializer instance.
///
/// Created from a [`SerializerClass`]; owns a copy of the class's field
/// declarations and its resolved [`Options`].
///
/// # Examples
///
/// ```
/// use graphcast_core::{DynamicObject, SerializeOptions, Serializer, SerializerClass, Source, ValueField, STRUCTURED_VALUE};
/// use serde_json::json;
///
/// let class = SerializerClass::builder("ItemSerializer")
///     .field("id", ValueField::new())
///     .field("name", ValueField::new())
///     .field("tags", ValueField::new())
///     .build();
/// let item = DynamicObject::new("Item")
///     .with("id", 1)
///     .with("name", "a")
///     .with("tags", vec![Source::from("x"), Source::from("y")])
///     .shared();
///
/// let serializer = Serializer::new(&class);
/// let full = serializer.serialize(STRUCTURED_VALUE, item.clone(), SerializeOptions::new()).unwrap();
/// assert_eq!(
///     full.into_native().unwrap().into_json().unwrap(),
///     json!({"id": 1, "name": "a", "tags": ["x", "y"]})
/// );
///
/// let named = serializer
///     .serialize(STRUCTURED_VALUE, item, SerializeOptions::new().with_fields(["name"]))
///     .unwrap();
/// assert_eq!(named.into_native().unwrap().into_json().unwrap(), json!({"name": "a"}));
/// ```
#[derive(Debug, Clone)]
pub struct Serializer {
	core: FieldCore,
	class: Arc<SerializerClass>,
	fields: FieldSet,
	opts: Options,
	pinned_nested: bool,
}

impl Serializer {
	/// Instance with the class configuration only
	pub fn new(class: &Arc<SerializerClass>) -> Self {
		Self::with_options(class, &Meta::default())
	}

	/// Instance with keyword overrides on top of the class configuration
	pub fn with_options(class: &Arc<SerializerClass>, kwargs: &Meta) -> Self {
		Self {
			core: FieldCore::new(),
			class: Arc::clone(class),
			fields: class.base_fields().clone(),
			opts: Options::resolve(kwargs, class.meta()),
			pinned_nested: false,
		}
	}

	/// Set the output key used when nested under a parent
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.core = self.core.with_label(label);
		self
	}

	/// Class the instance was created from
	pub fn class(&self) -> &Arc<SerializerClass> {
		&self.class
	}

	/// Resolved configuration
	pub fn options(&self) -> &Options {
		&self.opts
	}

	/// Declared fields of this instance
	pub fn fields(&self) -> &FieldSet {
		&self.fields
	}

	/// Field set used to convert `obj`, or to reconstruct data as `class`.
	///
	/// Declared fields come first and are bound to this serializer, default
	/// fields of the behaviour follow under names not yet taken. A non-empty
	/// `fields` option then selects and orders the result, `exclude` removes
	/// names. An allowlisted name that does not resolve is a configuration
	/// fault.
	pub fn get_fields(
		&self,
		obj: Option<&ObjectRef>,
		class: Option<&Arc<dyn ModelMeta>>,
		nested: Nested,
	) -> ConversionResult<FieldSet> {
		let fields = self.collect_fields(obj, class, nested)?;
		self.apply_policy(fields)
	}

	fn collect_fields(
		&self,
		obj: Option<&ObjectRef>,
		class: Option<&Arc<dyn ModelMeta>>,
		nested: Nested,
	) -> ConversionResult<FieldSet> {
		let model = obj.and_then(|obj| obj.model()).or_else(|| class.cloned());

		let mut ret = FieldSet::new();
		for (name, field) in self.fields.iter() {
			let model_field = model
				.as_deref()
				.and_then(|model| model_field_for(model, name));
			let mut field = field.clone_box();
			field.initialize(self, model_field);
			ret.insert(name, field);
		}

		let defaults = self
			.class
			.behavior()
			.default_fields(self, obj, class, nested)?;
		for (name, field) in defaults {
			if !ret.contains(&name) {
				ret.insert(name, field);
			}
		}

		trace!(
			serializer = self.class.name(),
			?nested,
			fields = ?ret.names().collect::<Vec<_>>(),
			"collected fields"
		);
		Ok(ret)
	}

	fn apply_policy(&self, mut fields: FieldSet) -> ConversionResult<FieldSet> {
		if !self.opts.fields.is_empty() {
			let mut selected = FieldSet::new();
			for name in &self.opts.fields {
				if selected.contains(name) {
					continue;
				}
				let field = fields
					.remove(name)
					.ok_or_else(|| ConfigurationError::UnknownField {
						serializer: self.class.name().to_string(),
						field: name.clone(),
					})?;
				selected.insert(name.clone(), field);
			}
			fields = selected;
		}

		for name in &self.opts.exclude {
			fields.remove(name);
		}
		Ok(fields)
	}

	/// Convert a source value into a primitive tree.
	///
	/// Sequences are converted lazily: the returned [`Sequence`] converts each
	/// element when it is pulled and can be drained once.
	pub fn to_native(&self, obj: Source, cx: &mut Traversal) -> ConversionResult<Primitive> {
		match obj {
			Source::Scalar(scalar) => Ok(Primitive::Scalar(scalar)),
			Source::Accessor(accessor) => self.to_native(accessor.call(), cx),
			Source::Mapping(map) => {
				let mut ret = PrimitiveMap::new();
				for (key, value) in map {
					ret.insert(key, self.to_native(value, cx)?);
				}
				Ok(Primitive::Mapping(ret))
			}
			Source::Sequence(items) => {
				let serializer = self.clone();
				let mut cx = cx.clone();
				Ok(Primitive::Sequence(Sequence::new(
					items
						.into_iter()
						.map(move |item| serializer.to_native(item, &mut cx)),
				)))
			}
			Source::Object(obj) => self.convert_object(&obj, cx),
		}
	}

	fn convert_object(&self, obj: &ObjectRef, cx: &mut Traversal) -> ConversionResult<Primitive> {
		if cx.is_visiting(obj) && !self.opts.is_root {
			return self.convert_revisited(obj, cx);
		}

		cx.visit_with(obj, |cx| {
			let fields = self.get_fields(Some(obj), None, self.opts.nested)?;
			let container = Source::Object(Rc::clone(obj));

			let mut ret = PrimitiveMap::new();
			for (name, field) in fields.iter() {
				let value = field.field_to_native(&container, name, cx)?;
				let is_root = field
					.as_serializer()
					.is_some_and(|serializer| serializer.opts.is_root);

				match value {
					Primitive::Mapping(merged) if is_root => {
						for (key, entry) in merged {
							match entry.meta {
								Some(meta) => ret.set_with_metadata(key, entry.value, meta),
								None => ret.insert(key, entry.value),
							}
						}
					}
					value => {
						ret.set_with_metadata(field.output_key(name), value, field.metadata(name))
					}
				}
			}
			Ok(Primitive::Mapping(ret))
		})
	}

	/// Flat representation of an object met again on the current branch.
	///
	/// The field this serializer was entered through is converted again on its
	/// container, with relations flat. A nested serializer found there is
	/// replaced by a plain value field so the conversion cannot recurse.
	fn convert_revisited(&self, obj: &ObjectRef, cx: &mut Traversal) -> ConversionResult<Primitive> {
		let Some((container, field_name)) = cx
			.origin()
			.map(|(container, name)| (container.clone(), name.to_string()))
		else {
			debug!(object = obj.type_name(), "object revisited at top level");
			return Ok(Primitive::Scalar(Scalar::String(obj.display())));
		};

		debug!(
			serializer = self.class.name(),
			object = obj.type_name(),
			field = %field_name,
			"cycle detected, using flat representation"
		);

		let fields = match container.as_object() {
			Some(owner) => self.collect_fields(Some(owner), None, Nested::Flat)?,
			None => FieldSet::new(),
		};
		match fields.get(&field_name) {
			Some(field) if field.as_serializer().is_none() => {
				field.field_to_native(&container, &field_name, cx)
			}
			_ => {
				let mut field = ValueField::new();
				field.initialize(self, None);
				field.field_to_native(&container, &field_name, cx)
			}
		}
	}

	/// Reconstruct from a primitive tree.
	///
	/// Mappings go through [`revert_fields`](Self::revert_fields) and the
	/// behaviour's `create_object`; sequences are reconstructed lazily.
	pub fn from_native(&self, data: Primitive, cx: &mut Traversal) -> ConversionResult<Reverted> {
		match data {
			Primitive::Scalar(scalar) => Ok(Reverted::Scalar(scalar)),
			Primitive::Sequence(items) => {
				let serializer = self.clone();
				let mut cx = cx.clone();
				Ok(Reverted::Sequence(RevertedSequence::new(items.map(
					move |item| item.and_then(|item| serializer.from_native(item, &mut cx)),
				))))
			}
			Primitive::Mapping(mut map) => {
				let class = self.revert_class(cx);
				let attrs = cx.within_class(class.clone(), |cx| {
					self.revert_fields(&mut map, class.as_ref(), cx)
				})?;
				self.create_object(class, attrs)
			}
		}
	}

	/// Collect the attribute mapping for `data`, one entry per field.
	///
	/// Fields take their own key out of `data`; missing keys reconstruct as
	/// null.
	pub fn revert_fields(
		&self,
		data: &mut PrimitiveMap,
		class: Option<&Arc<dyn ModelMeta>>,
		cx: &mut Traversal,
	) -> ConversionResult<Attributes> {
		let fields = self.get_fields(None, class, self.opts.nested)?;
		let mut attrs = Attributes::new();
		for (name, field) in fields.iter() {
			field.field_from_native(data, name, &mut attrs, cx)?;
		}
		Ok(attrs)
	}

	/// Class the data should become; a root field uses its enclosing
	/// serializer's class
	pub fn revert_class(&self, cx: &Traversal) -> Option<Arc<dyn ModelMeta>> {
		if self.opts.is_root {
			return cx.enclosing_class().cloned();
		}
		self.class.behavior().revert_class(self)
	}

	/// Final reconstruction step
	pub fn create_object(
		&self,
		class: Option<Arc<dyn ModelMeta>>,
		attrs: Attributes,
	) -> ConversionResult<Reverted> {
		self.class.behavior().create_object(self, class, attrs)
	}

	fn working_copy(&self, options: &SerializeOptions) -> Serializer {
		let mut working = self.clone();
		match working.fields.root_serializer_mut() {
			Some(root) => root.apply_overrides(options),
			None => working.apply_overrides(options),
		}
		working
	}

	fn apply_overrides(&mut self, options: &SerializeOptions) {
		if let Some(fields) = &options.fields {
			self.opts.fields = fields.clone();
		}
		if let Some(exclude) = &options.exclude {
			self.opts.exclude = exclude.clone();
		}
		if let Some(nested) = options.nested {
			self.opts.nested = nested;
			self.pinned_nested = true;
		}
	}

	/// Convert `obj` and encode it in `format`.
	///
	/// With [`STRUCTURED_VALUE`] the primitive tree itself is returned.
	/// Overrides apply to this call only.
	pub fn serialize(
		&self,
		format: &str,
		obj: impl Into<Source>,
		options: SerializeOptions,
	) -> SerializerResult<Serialized> {
		let working = self.working_copy(&options);
		let data = working.to_native(obj.into(), &mut Traversal::new())?;

		if format == STRUCTURED_VALUE {
			return Ok(Serialized::Native(data));
		}

		let mut buffer = Vec::new();
		working.render(data, &mut buffer, format, &options.render)?;
		Ok(Serialized::Rendered(buffer))
	}

	/// Convert `obj` and encode it straight into `out`.
	///
	/// The pass-through format has no encoding and is reported as unknown.
	pub fn serialize_to(
		&self,
		format: &str,
		obj: impl Into<Source>,
		out: &mut dyn Write,
		options: SerializeOptions,
	) -> SerializerResult<()> {
		let working = self.working_copy(&options);
		let data = working.to_native(obj.into(), &mut Traversal::new())?;
		working.render(data, out, format, &options.render)
	}

	/// Encode a primitive tree with the renderer registered for `format`
	pub fn render(
		&self,
		data: Primitive,
		out: &mut dyn Write,
		format: &str,
		options: &RenderOptions,
	) -> SerializerResult<()> {
		let renderer = self
			.opts
			.renderers
			.get(format)
			.ok_or_else(|| SerializerError::UnknownFormat(format.to_string()))?;

		debug!(
			serializer = self.class.name(),
			format,
			media_type = renderer.media_type(),
			"rendering"
		);
		renderer.render(data, out, options)?;
		Ok(())
	}

	/// Decode `input` with the parser registered for `format`
	pub fn parse(&self, input: &mut dyn Read, format: &str) -> SerializerResult<Primitive> {
		let parser = self
			.opts
			.parsers
			.get(format)
			.ok_or_else(|| SerializerError::UnknownFormat(format.to_string()))?;

		debug!(
			serializer = self.class.name(),
			format,
			media_type = parser.media_type(),
			"parsing"
		);
		Ok(parser.parse(input)?)
	}

	/// Decode `input` in `format` and reconstruct it.
	///
	/// With [`STRUCTURED_VALUE`] the input must already be a primitive tree.
	pub fn deserialize<'a>(
		&self,
		format: &str,
		input: impl Into<Payload<'a>>,
	) -> SerializerResult<Reverted> {
		let data = match (format, input.into()) {
			(STRUCTURED_VALUE, Payload::Native(data)) => data,
			(STRUCTURED_VALUE, payload) | (_, payload @ Payload::Native(_)) => {
				return Err(SerializerError::UnexpectedPayload {
					format: format.to_string(),
					payload: payload.kind(),
				});
			}
			(_, Payload::Bytes(mut bytes)) => self.parse(&mut bytes, format)?,
			(_, Payload::Reader(reader)) => self.parse(reader, format)?,
		};

		Ok(self.from_native(data, &mut Traversal::new())?)
	}
}

fn model_field_for(model: &dyn ModelMeta, name: &str) -> Option<ModelField> {
	if name == "pk" {
		return Some(resolve_pk(model));
	}
	model.get_field(name).cloned()
}

impl Field for Serializer {
	fn core(&self) -> &FieldCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut FieldCore {
		&mut self.core
	}

	fn initialize(&mut self, parent: &Serializer, model_field: Option<ModelField>) {
		self.core.bind(Binding {
			parent: parent.class.name().to_string(),
			model_field,
		});
		if !self.pinned_nested {
			self.opts.nested = parent.opts.nested.descend();
		}
	}

	fn field_to_native(
		&self,
		obj: &Source,
		field_name: &str,
		cx: &mut Traversal,
	) -> ConversionResult<Primitive> {
		let binding = self.core.require_binding(field_name)?;
		let mut child = cx.descend(obj, field_name);

		if self.opts.is_root {
			return self.to_native(obj.clone(), &mut child);
		}

		let value = extract(obj, field_name, binding);
		self.class
			.behavior()
			.value_to_native(self, value, &mut child)
	}

	fn field_from_native(
		&self,
		data: &mut PrimitiveMap,
		field_name: &str,
		into: &mut Attributes,
		cx: &mut Traversal,
	) -> ConversionResult<()> {
		self.core.require_binding(field_name)?;

		if self.opts.is_root {
			let class = self.revert_class(cx);
			let attrs =
				cx.within_class(class.clone(), |cx| self.revert_fields(data, class.as_ref(), cx))?;
			into.extend(attrs);
			return Ok(());
		}

		let value = data
			.take(self.output_key(field_name))
			.unwrap_or_else(Primitive::null);
		let reverted = self.from_native(value, cx)?;
		into.insert(field_name.to_string(), reverted);
		Ok(())
	}

	fn kind(&self) -> FieldKind {
		FieldKind::Nested
	}

	fn as_serializer(&self) -> Option<&Serializer> {
		Some(self)
	}

	fn as_serializer_mut(&mut self) -> Option<&mut Serializer> {
		Some(self)
	}

	fn clone_box(&self) -> Box<dyn Field> {
		Box::new(self.clone())
	}
}
