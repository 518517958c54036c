//! # graphcast-formats
//!
//! Wire formats for graphcast primitive trees.
//!
//! A [`Renderer`] writes a [`Primitive`](graphcast_types::Primitive) tree to a
//! byte stream, a [`Parser`] reads one back. Both are looked up by format
//! identifier through [`RendererRegistry`] and [`ParserRegistry`].
//!
//! ## Features
//!
//! - `json` (default): JSON renderer and parser
//! - `yaml` (default): YAML renderer and parser
//! - `xml` (default): XML renderer
//! - `csv` (default): CSV renderer
//! - `html` (default): HTML fragment renderer
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "json")]
//! # {
//! use graphcast_formats::{RenderOptions, RendererRegistry, render_to_vec};
//! use graphcast_types::{Primitive, PrimitiveMap, Scalar};
//!
//! let mut map = PrimitiveMap::new();
//! map.insert("id", Scalar::from(1));
//!
//! let registry = RendererRegistry::builtin();
//! let json = registry.get("json").unwrap();
//! let bytes = render_to_vec(json.as_ref(), Primitive::Mapping(map), &RenderOptions::new()).unwrap();
//! assert_eq!(bytes, br#"{"id":1}"#);
//! # }
//! ```

pub mod error;
pub mod parsers;
pub mod renderers;

pub use error::{ParseError, ParseResult, RenderError, RenderResult};
pub use parsers::{Parser, ParserRegistry, parse_slice};
pub use renderers::{RenderOptions, Renderer, RendererRegistry, render_to_vec};
