//! Serializer variants
//!
//! The graph walker only talks to a [`SerializerBehavior`]. The plain
//! [`Declared`] behaviour uses explicitly declared fields only;
//! [`ObjectFields`](crate::ObjectFields) and [`ModelFields`](crate::ModelFields)
//! derive default fields from the instance or its model.

use std::fmt;
use std::sync::Arc;

use graphcast_types::{ConversionResult, Primitive};

use crate::context::Traversal;
use crate::fields::{Field, ValueField};
use crate::fieldset::FieldSet;
use crate::model::{ModelField, ModelMeta};
use crate::options::Nested;
use crate::reverted::{Attributes, Reverted};
use crate::serializer::Serializer;
use crate::source::{ObjectRef, Source};

/// Capability interface of a serializer variant.
///
/// Every hook has a default matching a serializer with declared fields only.
pub trait SerializerBehavior: fmt::Debug + Send + Sync {
	/// Fields derived from the instance (serialization) or from the target
	/// class (reconstruction). Declared fields with the same name win.
	fn default_fields(
		&self,
		_serializer: &Serializer,
		_obj: Option<&ObjectRef>,
		_class: Option<&Arc<dyn ModelMeta>>,
		_nested: Nested,
	) -> ConversionResult<FieldSet> {
		Ok(FieldSet::new())
	}

	/// Field for a relation, expanded when `nested` is set
	fn bind_relation(
		&self,
		_serializer: &Serializer,
		_model_field: Option<&ModelField>,
		_nested: bool,
	) -> Box<dyn Field> {
		Box::new(ValueField::new())
	}

	/// Field for a plain attribute
	fn bind_scalar(
		&self,
		_serializer: &Serializer,
		_model_field: Option<&ModelField>,
	) -> Box<dyn Field> {
		Box::new(ValueField::new())
	}

	/// Convert the attribute value a nested serializer was entered with
	fn value_to_native(
		&self,
		serializer: &Serializer,
		value: Source,
		cx: &mut Traversal,
	) -> ConversionResult<Primitive> {
		serializer.to_native(value, cx)
	}

	/// Class the reconstructed data should become
	fn revert_class(&self, _serializer: &Serializer) -> Option<Arc<dyn ModelMeta>> {
		None
	}

	/// Final reconstruction step
	fn create_object(
		&self,
		_serializer: &Serializer,
		_class: Option<Arc<dyn ModelMeta>>,
		attrs: Attributes,
	) -> ConversionResult<Reverted> {
		Ok(Reverted::Attributes(attrs))
	}
}

/// Behaviour of a serializer made of declared fields only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Declared;

impl SerializerBehavior for Declared {}
