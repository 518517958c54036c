//! # graphcast
//!
//! Declarative serializers for object graphs.
//!
//! graphcast converts an arbitrary object graph into a tree of primitive
//! values (scalars, ordered mappings, sequences), encodes that tree in a wire
//! format, and reverts decoded trees back into attribute mappings or model
//! instance descriptions.
//!
//! ## Core Principles
//!
//! - **Declarative fields**: serializer classes declare ordered fields and
//!   inherit them from base classes
//! - **Cycle safety**: objects met again on the current branch degrade to a
//!   flat representation instead of recursing
//! - **Nesting budget**: relations are expanded to a configurable depth and
//!   rendered as primary keys beyond it
//! - **Pluggable formats**: renderers and parsers are looked up by format
//!   identifier
//!
//! ## Feature Flags
//!
//! - `full` (default) - All wire formats
//! - `json` - JSON renderer and parser (via `serde_json`)
//! - `yaml` - YAML renderer and parser (via `serde_yaml`)
//! - `xml` - XML renderer (via `quick-xml`)
//! - `csv` - CSV renderer (via `csv`)
//! - `html` - HTML fragment renderer
//!
//! ## Quick Example
//!
//! ```rust
//! use graphcast::prelude::*;
//! use serde_json::json;
//!
//! let user_model = ModelDescriptor::new("quickstart.User").field("username").register();
//! let post_model = ModelDescriptor::new("quickstart.Post")
//!     .field("title")
//!     .foreign_key("author", "quickstart.User")
//!     .register();
//!
//! let author = DynamicObject::new("User")
//!     .with("id", 7)
//!     .with("username", "alice")
//!     .with_model(user_model)
//!     .shared();
//! let post = DynamicObject::new("Post")
//!     .with("id", 1)
//!     .with("title", "Hi")
//!     .with("author", author)
//!     .with_model(post_model)
//!     .shared();
//!
//! let serializer = MODEL_SERIALIZER.instantiate(&Meta::new().with_nested(true));
//! let out = serializer
//!     .serialize(STRUCTURED_VALUE, post, SerializeOptions::new())
//!     .unwrap();
//! assert_eq!(
//!     out.into_native().unwrap().into_json().unwrap(),
//!     json!({"id": 1, "title": "Hi", "author": {"id": 7, "username": "alice"}})
//! );
//! ```

pub mod core;
pub mod formats;
pub mod types;

pub use graphcast_core::{
	Accessor, Attributes, DynamicObject, Field, FieldSet, MODEL_SERIALIZER, Meta, ModelDescriptor,
	ModelField, ModelMeta, Nested, OBJECT_SERIALIZER, Object, ObjectRef, Payload,
	PrimaryKeyRelatedField, Reverted, STRUCTURED_VALUE, SerializeOptions, Serialized, Serializer,
	SerializerBehavior, SerializerClass, SerializerError, SerializerResult, Source, ValueField,
	get_model, register_model,
};
pub use graphcast_formats::{
	ParseError, Parser, ParserRegistry, RenderError, RenderOptions, Renderer, RendererRegistry,
};
pub use graphcast_types::{
	ConfigurationError, FieldKind, FieldMeta, Primitive, PrimitiveMap, Scalar, Sequence,
};

/// Commonly used types
pub mod prelude {
	pub use crate::{
		Accessor, ConfigurationError, DynamicObject, Field, MODEL_SERIALIZER, Meta,
		ModelDescriptor, ModelField, ModelMeta, Nested, OBJECT_SERIALIZER, Object, Primitive,
		PrimitiveMap, Reverted, STRUCTURED_VALUE, Scalar, SerializeOptions, Serializer,
		SerializerClass, SerializerError, Source, ValueField,
	};
}
