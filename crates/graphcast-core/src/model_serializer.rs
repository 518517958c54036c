//! Serializer for model instances
//!
//! Field sets are derived from the [`ModelMeta`] of the instance, of the class
//! being reconstructed, or of the serializer's configured model. Relations are
//! expanded into nested model serializers while the nesting budget allows it
//! and rendered as primary keys otherwise.

use std::sync::Arc;

use graphcast_types::{ConfigurationError, ConversionResult, Primitive, Sequence};
use once_cell::sync::Lazy;

use crate::behavior::SerializerBehavior;
use crate::context::Traversal;
use crate::fields::{Field, ValueField};
use crate::fieldset::{FieldSet, SerializerClass};
use crate::model::{ModelField, ModelMeta, get_model, resolve_pk};
use crate::options::{Meta, Nested};
use crate::relations::PrimaryKeyRelatedField;
use crate::reverted::{Attributes, DeserializedObject, Reverted};
use crate::serializer::Serializer;
use crate::source::{ObjectRef, Source};

/// Behaviour of [`MODEL_SERIALIZER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelFields;

impl ModelFields {
	fn missing_model(serializer: &Serializer) -> ConfigurationError {
		ConfigurationError::MissingModel {
			serializer: serializer.class().name().to_string(),
		}
	}
}

impl SerializerBehavior for ModelFields {
	/// Resolved primary key first, then serializable single-valued fields,
	/// then serializable many-to-many relations.
	fn default_fields(
		&self,
		serializer: &Serializer,
		obj: Option<&ObjectRef>,
		class: Option<&Arc<dyn ModelMeta>>,
		nested: Nested,
	) -> ConversionResult<FieldSet> {
		let model = obj
			.and_then(|obj| obj.model())
			.or_else(|| class.cloned())
			.or_else(|| serializer.options().model.clone())
			.ok_or_else(|| Self::missing_model(serializer))?;

		let model_fields = std::iter::once(resolve_pk(model.as_ref()))
			.chain(model.fields().iter().filter(|f| f.serialize).cloned())
			.chain(model.many_to_many().iter().filter(|f| f.serialize).cloned());

		let mut ret = FieldSet::new();
		for model_field in model_fields {
			let mut field = if model_field.is_relation() {
				self.bind_relation(serializer, Some(&model_field), nested.is_nested())
			} else {
				self.bind_scalar(serializer, Some(&model_field))
			};
			let name = model_field.name.clone();
			field.initialize(serializer, Some(model_field));
			ret.insert(name, field);
		}
		Ok(ret)
	}

	fn bind_relation(
		&self,
		_serializer: &Serializer,
		model_field: Option<&ModelField>,
		nested: bool,
	) -> Box<dyn Field> {
		if !nested {
			return Box::new(PrimaryKeyRelatedField::new());
		}

		let target = model_field
			.and_then(|field| field.relation.as_ref())
			.and_then(|relation| get_model(&relation.to));
		let meta = match target {
			Some(model) => Meta::new().with_model(model),
			None => Meta::new(),
		};
		Box::new(MODEL_SERIALIZER.instantiate(&meta))
	}

	fn bind_scalar(
		&self,
		_serializer: &Serializer,
		_model_field: Option<&ModelField>,
	) -> Box<dyn Field> {
		Box::new(ValueField::new())
	}

	/// Multi-valued relations are converted eagerly.
	fn value_to_native(
		&self,
		serializer: &Serializer,
		value: Source,
		cx: &mut Traversal,
	) -> ConversionResult<Primitive> {
		match value {
			Source::Sequence(items) => {
				let mut out = Vec::with_capacity(items.len());
				for item in items {
					out.push(serializer.to_native(item, cx)?);
				}
				Ok(Primitive::Sequence(Sequence::from_values(out)))
			}
			Source::Accessor(accessor) => self.value_to_native(serializer, accessor.call(), cx),
			other => serializer.to_native(other, cx),
		}
	}

	fn revert_class(&self, serializer: &Serializer) -> Option<Arc<dyn ModelMeta>> {
		serializer.options().model.clone()
	}

	fn create_object(
		&self,
		serializer: &Serializer,
		class: Option<Arc<dyn ModelMeta>>,
		attrs: Attributes,
	) -> ConversionResult<Reverted> {
		let model = class.ok_or_else(|| Self::missing_model(serializer))?;

		let mut attributes = Attributes::new();
		let mut many_to_many = Attributes::new();
		for (name, value) in attrs {
			if model.many_to_many().iter().any(|field| field.name == name) {
				many_to_many.insert(name, value);
			} else {
				attributes.insert(name, value);
			}
		}

		Ok(Reverted::Object(DeserializedObject {
			model,
			attributes,
			many_to_many,
		}))
	}
}

/// Class template of the model serializer.
///
/// ```
/// use graphcast_core::{DynamicObject, MODEL_SERIALIZER, Meta, ModelDescriptor, SerializeOptions, STRUCTURED_VALUE};
/// use serde_json::json;
///
/// let post_model = ModelDescriptor::new("model_serializer_doc.Post").field("title").into_arc();
/// let post = DynamicObject::new("Post")
///     .with("id", 1)
///     .with("title", "Hi")
///     .with("draft", true)
///     .with_model(post_model.clone())
///     .shared();
///
/// let serializer = MODEL_SERIALIZER.instantiate(&Meta::new().with_model(post_model));
/// let out = serializer.serialize(STRUCTURED_VALUE, post, SerializeOptions::new()).unwrap();
/// assert_eq!(out.into_native().unwrap().into_json().unwrap(), json!({"id": 1, "title": "Hi"}));
/// ```
pub static MODEL_SERIALIZER: Lazy<Arc<SerializerClass>> = Lazy::new(|| {
	SerializerClass::builder("ModelSerializer")
		.behavior(ModelFields)
		.build()
});
