//! # graphcast-types
//!
//! Format-independent value tree shared by the graphcast crates.
//!
//! Serializers produce a [`Primitive`] tree from an object graph, renderers
//! encode it, parsers decode into it and serializers revert it back into
//! attribute mappings.
//!
//! ## Examples
//!
//! ```
//! use graphcast_types::{Primitive, PrimitiveMap, Scalar};
//!
//! let mut user = PrimitiveMap::new();
//! user.insert("id", Scalar::from(1));
//! user.insert("name", Scalar::from("Alice"));
//!
//! let json = Primitive::Mapping(user).into_json().unwrap();
//! assert_eq!(json, serde_json::json!({"id": 1, "name": "Alice"}));
//! ```

pub mod error;
pub mod primitive;
pub mod scalar;

pub use error::{ConfigurationError, ConversionResult};
pub use primitive::{Entry, FieldKind, FieldMeta, Primitive, PrimitiveMap, Sequence};
pub use scalar::Scalar;
