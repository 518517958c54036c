//! Serializer engine module.
//!
//! Field declarations, serializer classes and the object graph walker.
//!
//! # Examples
//!
//! ```rust
//! use graphcast::core::{SerializerClass, ValueField};
//!
//! let class = SerializerClass::builder("PostSerializer")
//!     .field("title", ValueField::new())
//!     .build();
//! assert_eq!(class.name(), "PostSerializer");
//! ```

pub use graphcast_core::*;
