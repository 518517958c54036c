//! Wire formats module.
//!
//! Renderers and parsers for the built-in formats, and the registries that
//! map format identifiers to them.
//!
//! # Examples
//!
//! ```rust
//! use graphcast::formats::RendererRegistry;
//!
//! let registry = RendererRegistry::builtin();
//! # #[cfg(feature = "json")]
//! assert!(registry.get("json").is_some());
//! ```

pub use graphcast_formats::*;
