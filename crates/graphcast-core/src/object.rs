//! Serializer for arbitrary objects
//!
//! Derives one field per public attribute of the instance being converted.
//! Reconstruction is not supported: without an instance there is nothing to
//! derive the field set from.

use std::sync::Arc;

use graphcast_types::{ConfigurationError, ConversionResult};
use once_cell::sync::Lazy;

use crate::behavior::SerializerBehavior;
use crate::fields::{Field, ValueField};
use crate::fieldset::{FieldSet, SerializerClass};
use crate::model::{ModelField, ModelMeta};
use crate::options::{Meta, Nested};
use crate::serializer::Serializer;
use crate::source::ObjectRef;

/// Behaviour of [`OBJECT_SERIALIZER`].
///
/// Attributes whose name starts with `_` are private and skipped; the others
/// are emitted sorted by name. When the nesting policy allows it, every
/// attribute is converted by a fresh serializer of the same class, otherwise
/// by a [`ValueField`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectFields;

impl SerializerBehavior for ObjectFields {
	fn default_fields(
		&self,
		serializer: &Serializer,
		obj: Option<&ObjectRef>,
		_class: Option<&Arc<dyn ModelMeta>>,
		nested: Nested,
	) -> ConversionResult<FieldSet> {
		let obj = obj.ok_or_else(|| ConfigurationError::DeserializationUnsupported {
			serializer: serializer.class().name().to_string(),
		})?;

		let mut names: Vec<String> = obj
			.attribute_names()
			.into_iter()
			.filter(|name| !name.starts_with('_'))
			.collect();
		names.sort();

		let mut ret = FieldSet::new();
		for name in names {
			let mut field = if nested.is_nested() {
				self.bind_relation(serializer, None, true)
			} else {
				self.bind_scalar(serializer, None)
			};
			field.initialize(serializer, None);
			ret.insert(name, field);
		}
		Ok(ret)
	}

	fn bind_relation(
		&self,
		serializer: &Serializer,
		_model_field: Option<&ModelField>,
		nested: bool,
	) -> Box<dyn Field> {
		if nested {
			Box::new(serializer.class().instantiate(&Meta::new()))
		} else {
			Box::new(ValueField::new())
		}
	}
}

/// Class template of the generic object serializer.
///
/// Use it directly, or as a base for classes that add declared fields:
///
/// ```
/// use graphcast_core::{DynamicObject, Meta, OBJECT_SERIALIZER, SerializeOptions, STRUCTURED_VALUE};
/// use serde_json::json;
///
/// let user = DynamicObject::new("User").with("name", "alice").with("_token", "t").shared();
/// let doc = DynamicObject::new("Doc").with("title", "Hi").with("owner", user).shared();
///
/// let serializer = OBJECT_SERIALIZER.instantiate(&Meta::new().with_nested(true));
/// let out = serializer.serialize(STRUCTURED_VALUE, doc, SerializeOptions::new()).unwrap();
/// assert_eq!(
///     out.into_native().unwrap().into_json().unwrap(),
///     json!({"owner": {"name": "alice"}, "title": "Hi"})
/// );
/// ```
pub static OBJECT_SERIALIZER: Lazy<Arc<SerializerClass>> = Lazy::new(|| {
	SerializerClass::builder("ObjectSerializer")
		.behavior(ObjectFields)
		.build()
});
