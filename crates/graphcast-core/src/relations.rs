//! Relation fields
//!
//! Flat representations of related objects, used when the nesting budget does
//! not allow expanding a relation into a nested serializer.

use graphcast_types::{ConversionResult, FieldKind, Primitive, PrimitiveMap, Sequence};

use crate::context::Traversal;
use crate::fields::{Field, FieldCore, extract, flat_to_native};
use crate::reverted::{Attributes, Reverted};
use crate::source::{Source, get_attribute};

/// PrimaryKeyRelatedField - Represent relationships by primary key
///
/// A related object is written as the value of its primary key; a
/// multi-valued relation as the sequence of its members' keys.
///
/// ```text
/// {"id": 1, "title": "My Post", "author": 42, "tags": [3, 5]}
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrimaryKeyRelatedField {
	core: FieldCore,
}

impl PrimaryKeyRelatedField {
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

fn primary_key_of(value: Source) -> Primitive {
	match value {
		Source::Object(obj) => {
			flat_to_native(get_attribute(obj.as_ref(), "pk").unwrap_or_else(Source::null))
		}
		Source::Accessor(accessor) => primary_key_of(accessor.call()),
		Source::Sequence(items) => Primitive::Sequence(Sequence::from_values(
			items.into_iter().map(primary_key_of).collect::<Vec<_>>(),
		)),
		other => flat_to_native(other),
	}
}

impl Field for PrimaryKeyRelatedField {
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
		Ok(primary_key_of(extract(obj, field_name, binding)))
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

	fn kind(&self) -> FieldKind {
		FieldKind::Related
	}

	fn clone_box(&self) -> Box<dyn Field> {
		Box::new(self.clone())
	}
}
