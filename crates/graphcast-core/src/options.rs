//! Serializer configuration
//!
//! Each option is resolved from a keyword override given at construction,
//! then the class's [`Meta`] block, then a default. Resolution never fails.

use std::sync::Arc;

use graphcast_formats::{ParserRegistry, RendererRegistry};
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::model::ModelMeta;

static BUILTIN_RENDERERS: Lazy<RendererRegistry> = Lazy::new(RendererRegistry::builtin);
static BUILTIN_PARSERS: Lazy<ParserRegistry> = Lazy::new(ParserRegistry::builtin);

/// Nesting policy for relations.
///
/// Deserializes from `false` (flat), `true` (unlimited) or a non-negative
/// integer (remaining budget).
///
/// # Examples
///
/// ```
/// use graphcast_core::Nested;
///
/// let nested: Nested = serde_json::from_str("2").unwrap();
/// assert_eq!(nested, Nested::Depth(2));
/// assert_eq!(nested.descend(), Nested::Depth(1));
/// assert_eq!(Nested::Unlimited.descend(), Nested::Unlimited);
/// assert!(!Nested::Depth(0).is_nested());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "NestedRepr")]
pub enum Nested {
	/// Relations are rendered flat
	#[default]
	Flat,
	/// Relations are expanded without limit
	Unlimited,
	/// Relations are expanded for this many more levels
	Depth(u32),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NestedRepr {
	Switch(bool),
	Depth(u32),
}

impl From<NestedRepr> for Nested {
	fn from(repr: NestedRepr) -> Self {
		match repr {
			NestedRepr::Switch(on) => Nested::from(on),
			NestedRepr::Depth(depth) => Nested::Depth(depth),
		}
	}
}

impl From<bool> for Nested {
	fn from(on: bool) -> Self {
		if on { Nested::Unlimited } else { Nested::Flat }
	}
}

impl From<u32> for Nested {
	fn from(depth: u32) -> Self {
		Nested::Depth(depth)
	}
}

impl Nested {
	/// Whether relations at this level are expanded
	pub fn is_nested(self) -> bool {
		match self {
			Nested::Flat => false,
			Nested::Unlimited => true,
			Nested::Depth(depth) => depth > 0,
		}
	}

	/// Policy of a child serializer: a positive budget shrinks by one, anything
	/// else is inherited unchanged
	pub fn descend(self) -> Self {
		match self {
			Nested::Depth(depth) if depth > 0 => Nested::Depth(depth - 1),
			other => other,
		}
	}
}

/// Configuration block of a serializer class, also used for keyword overrides.
///
/// Unset entries fall through to the next layer. Registries and the model
/// binding are set programmatically; the remaining entries can be loaded
/// from a settings document.
///
/// # Examples
///
/// ```
/// use graphcast_core::{Meta, Nested};
///
/// let meta: Meta = serde_json::from_str(r#"{"fields": ["id", "name"], "nested": true}"#).unwrap();
/// assert_eq!(meta.fields.as_deref(), Some(&["id".to_string(), "name".to_string()][..]));
/// assert_eq!(meta.nested, Some(Nested::Unlimited));
/// assert!(meta.exclude.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Meta {
	/// Explicit allowlist and order
	pub fields: Option<Vec<String>>,
	/// Names removed from the field set
	pub exclude: Option<Vec<String>>,
	/// Nesting policy
	pub nested: Option<Nested>,
	/// Merge output into the parent's mapping
	pub is_root: Option<bool>,
	/// Model used for reconstruction
	#[serde(skip)]
	pub model: Option<Arc<dyn ModelMeta>>,
	/// Format identifier to renderer mapping
	#[serde(skip)]
	pub renderers: Option<RendererRegistry>,
	/// Format identifier to parser mapping
	#[serde(skip)]
	pub parsers: Option<ParserRegistry>,
}

impl Meta {
	/// Empty configuration block
	pub fn new() -> Self {
		Self::default()
	}

	/// Specify which fields to include, in output order
	pub fn with_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Specify which fields to exclude
	pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.exclude = Some(exclude.into_iter().map(Into::into).collect());
		self
	}

	/// Set the nesting policy
	pub fn with_nested(mut self, nested: impl Into<Nested>) -> Self {
		self.nested = Some(nested.into());
		self
	}

	/// Mark the serializer as a root field
	pub fn with_is_root(mut self, is_root: bool) -> Self {
		self.is_root = Some(is_root);
		self
	}

	/// Bind a model
	pub fn with_model(mut self, model: Arc<dyn ModelMeta>) -> Self {
		self.model = Some(model);
		self
	}

	/// Replace the renderer registry
	pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
		self.renderers = Some(renderers);
		self
	}

	/// Replace the parser registry
	pub fn with_parsers(mut self, parsers: ParserRegistry) -> Self {
		self.parsers = Some(parsers);
		self
	}
}

/// Resolved configuration of one serializer instance.
#[derive(Debug, Clone)]
pub struct Options {
	/// Explicit allowlist and order; empty means no override
	pub fields: Vec<String>,
	/// Names removed from the field set
	pub exclude: Vec<String>,
	/// Nesting policy
	pub nested: Nested,
	/// Merge output into the parent's mapping
	pub is_root: bool,
	/// Model used for reconstruction
	pub model: Option<Arc<dyn ModelMeta>>,
	/// Format identifier to renderer mapping
	pub renderers: RendererRegistry,
	/// Format identifier to parser mapping
	pub parsers: ParserRegistry,
}

impl Options {
	/// Resolve every option from `kwargs`, then `meta`, then the default.
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_core::{Meta, Nested, Options};
	///
	/// let meta = Meta::new().with_fields(["id", "name"]).with_nested(true);
	/// let kwargs = Meta::new().with_nested(Nested::Depth(1));
	///
	/// let opts = Options::resolve(&kwargs, &meta);
	/// assert_eq!(opts.fields, vec!["id", "name"]);
	/// assert_eq!(opts.nested, Nested::Depth(1));
	/// assert!(opts.exclude.is_empty());
	/// assert!(!opts.is_root);
	/// ```
	pub fn resolve(kwargs: &Meta, meta: &Meta) -> Self {
		Self {
			fields: kwargs
				.fields
				.clone()
				.or_else(|| meta.fields.clone())
				.unwrap_or_default(),
			exclude: kwargs
				.exclude
				.clone()
				.or_else(|| meta.exclude.clone())
				.unwrap_or_default(),
			nested: kwargs.nested.or(meta.nested).unwrap_or_default(),
			is_root: kwargs.is_root.or(meta.is_root).unwrap_or(false),
			model: kwargs.model.clone().or_else(|| meta.model.clone()),
			renderers: kwargs
				.renderers
				.clone()
				.or_else(|| meta.renderers.clone())
				.unwrap_or_else(|| BUILTIN_RENDERERS.clone()),
			parsers: kwargs
				.parsers
				.clone()
				.or_else(|| meta.parsers.clone())
				.unwrap_or_else(|| BUILTIN_PARSERS.clone()),
		}
	}
}

impl Default for Options {
	fn default() -> Self {
		Self::resolve(&Meta::default(), &Meta::default())
	}
}
