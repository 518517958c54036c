//! # graphcast-core
//!
//! Declarative serializers that walk an object graph into a
//! [`Primitive`](graphcast_types::Primitive) tree and back.
//!
//! ## Overview
//!
//! - [`SerializerClass`]: ordered field declarations with inheritance, a
//!   [`Meta`] configuration block and a variant behaviour
//! - [`Serializer`]: an instance of a class; resolves the field set for each
//!   object and converts in both directions
//! - [`Field`]: leaf conversion unit; serializers are fields too, which is how
//!   they nest
//! - [`Traversal`]: per-call state carrying the cycle-detection stack
//!
//! Three variants are provided: declared fields only ([`Declared`]), one field
//! per public attribute ([`OBJECT_SERIALIZER`]) and fields derived from model
//! introspection ([`MODEL_SERIALIZER`]).
//!
//! ## Example
//!
//! ```
//! use graphcast_core::{DynamicObject, Meta, OBJECT_SERIALIZER, SerializeOptions, STRUCTURED_VALUE};
//! use serde_json::json;
//!
//! let x = DynamicObject::new("Node").with("name", "x").with_display("x").shared();
//! let y = DynamicObject::new("Node").with("name", "y").with("peer", x.clone()).shared();
//! x.set("peer", y);
//!
//! let serializer = OBJECT_SERIALIZER.instantiate(&Meta::new().with_nested(true));
//! let out = serializer.serialize(STRUCTURED_VALUE, x, SerializeOptions::new()).unwrap();
//! assert_eq!(
//!     out.into_native().unwrap().into_json().unwrap(),
//!     json!({"name": "x", "peer": {"name": "y", "peer": "x"}})
//! );
//! ```

pub mod behavior;
pub mod context;
pub mod error;
pub mod fields;
pub mod fieldset;
pub mod model;
pub mod model_serializer;
pub mod object;
pub mod options;
pub mod relations;
pub mod reverted;
pub mod serializer;
pub mod source;

pub use behavior::{Declared, SerializerBehavior};
pub use context::Traversal;
pub use error::{SerializerError, SerializerResult};
pub use fields::{Binding, Field, FieldCore, ValueField, extract, flat_to_native};
pub use fieldset::{FieldSet, SerializerClass, SerializerClassBuilder};
pub use model::{
	ModelDescriptor, ModelField, ModelMeta, Relation, RelationKind, get_model, register_model,
	resolve_pk,
};
pub use model_serializer::{MODEL_SERIALIZER, ModelFields};
pub use object::{OBJECT_SERIALIZER, ObjectFields};
pub use options::{Meta, Nested, Options};
pub use relations::PrimaryKeyRelatedField;
pub use reverted::{Attributes, DeserializedObject, Reverted, RevertedSequence};
pub use serializer::{Payload, STRUCTURED_VALUE, SerializeOptions, Serialized, Serializer};
pub use source::{Accessor, DynamicObject, Object, ObjectId, ObjectRef, Source, get_attribute};
