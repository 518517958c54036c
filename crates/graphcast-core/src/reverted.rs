//! Reconstruction output
//!
//! [`Reverted`] is what deserialization produces: scalars pass through,
//! mappings become flat attribute mappings (or model-bound
//! [`DeserializedObject`]s), sequences stay lazy and single-pass.

use std::fmt;
use std::sync::Arc;

use graphcast_types::{ConversionResult, Primitive, Scalar};
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::model::ModelMeta;

/// Flat attribute mapping keyed by field name.
pub type Attributes = IndexMap<String, Reverted>;

/// Reconstructed value.
#[derive(Debug)]
pub enum Reverted {
	/// Protected scalar
	Scalar(Scalar),
	/// Attribute mapping, the default reconstruction result
	Attributes(Attributes),
	/// Model instance description with relations split out
	Object(DeserializedObject),
	/// Lazily reconstructed sequence
	Sequence(RevertedSequence),
}

impl Reverted {
	/// Structural conversion without any field set.
	///
	/// Mapping keys are kept as attribute names.
	pub fn from_primitive(value: Primitive) -> Self {
		match value {
			Primitive::Scalar(scalar) => Reverted::Scalar(scalar),
			Primitive::Mapping(map) => Reverted::Attributes(
				map.into_iter()
					.map(|(key, entry)| (key, Reverted::from_primitive(entry.value)))
					.collect(),
			),
			Primitive::Sequence(items) => Reverted::Sequence(RevertedSequence::new(
				items.map(|item| item.map(Reverted::from_primitive)),
			)),
		}
	}

	/// Borrow the scalar payload
	pub fn as_scalar(&self) -> Option<&Scalar> {
		match self {
			Reverted::Scalar(scalar) => Some(scalar),
			_ => None,
		}
	}

	/// Borrow the attribute mapping
	pub fn as_attributes(&self) -> Option<&Attributes> {
		match self {
			Reverted::Attributes(attrs) => Some(attrs),
			_ => None,
		}
	}

	/// Take the attribute mapping
	pub fn into_attributes(self) -> Option<Attributes> {
		match self {
			Reverted::Attributes(attrs) => Some(attrs),
			_ => None,
		}
	}

	/// Take the model instance description
	pub fn into_object(self) -> Option<DeserializedObject> {
		match self {
			Reverted::Object(obj) => Some(obj),
			_ => None,
		}
	}

	/// Take the lazy sequence
	pub fn into_sequence(self) -> Option<RevertedSequence> {
		match self {
			Reverted::Sequence(seq) => Some(seq),
			_ => None,
		}
	}

	/// Drain into JSON.
	///
	/// Model instances become `{"model": .., "fields": .., "many_to_many": ..}`.
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_core::Reverted;
	/// use graphcast_types::Primitive;
	/// use serde_json::json;
	///
	/// let tree = Primitive::from_json(json!({"id": 1, "tags": ["x"]}));
	/// let reverted = Reverted::from_primitive(tree);
	/// assert_eq!(reverted.into_json().unwrap(), json!({"id": 1, "tags": ["x"]}));
	/// ```
	pub fn into_json(self) -> ConversionResult<JsonValue> {
		match self {
			Reverted::Scalar(scalar) => Ok(scalar.to_json()),
			Reverted::Attributes(attrs) => Ok(JsonValue::Object(attributes_to_json(attrs)?)),
			Reverted::Object(obj) => {
				let mut out = JsonMap::new();
				out.insert(
					"model".to_string(),
					JsonValue::String(obj.model.name().to_string()),
				);
				out.insert(
					"fields".to_string(),
					JsonValue::Object(attributes_to_json(obj.attributes)?),
				);
				out.insert(
					"many_to_many".to_string(),
					JsonValue::Object(attributes_to_json(obj.many_to_many)?),
				);
				Ok(JsonValue::Object(out))
			}
			Reverted::Sequence(items) => {
				let mut out = Vec::new();
				for item in items {
					out.push(item?.into_json()?);
				}
				Ok(JsonValue::Array(out))
			}
		}
	}
}

fn attributes_to_json(attrs: Attributes) -> ConversionResult<JsonMap<String, JsonValue>> {
	let mut out = JsonMap::new();
	for (key, value) in attrs {
		out.insert(key, value.into_json()?);
	}
	Ok(out)
}

/// Attribute set of a model instance awaiting construction.
///
/// Many-to-many values are kept apart because they can only be assigned once
/// the instance exists.
#[derive(Debug)]
pub struct DeserializedObject {
	/// Model the attributes belong to
	pub model: Arc<dyn ModelMeta>,
	/// Single-valued attributes
	pub attributes: Attributes,
	/// Many-to-many attributes
	pub many_to_many: Attributes,
}

/// Lazily reconstructed, single-pass sequence.
pub struct RevertedSequence {
	items: Box<dyn Iterator<Item = ConversionResult<Reverted>>>,
}

impl RevertedSequence {
	/// Wrap a lazy iterator
	pub fn new<I>(items: I) -> Self
	where
		I: Iterator<Item = ConversionResult<Reverted>> + 'static,
	{
		Self {
			items: Box::new(items),
		}
	}
}

impl Iterator for RevertedSequence {
	type Item = ConversionResult<Reverted>;

	fn next(&mut self) -> Option<Self::Item> {
		self.items.next()
	}
}

impl fmt::Debug for RevertedSequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("RevertedSequence(..)")
	}
}
