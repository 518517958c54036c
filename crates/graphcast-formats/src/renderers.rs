//! Renderers: primitive tree to byte stream.

#[cfg(feature = "csv")]
pub mod csv_renderer;
#[cfg(feature = "html")]
pub mod html;
#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "xml")]
pub mod xml;
#[cfg(feature = "yaml")]
pub mod yaml;

use crate::error::RenderResult;
use graphcast_types::Primitive;
use indexmap::IndexMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Per-call rendering options.
///
/// # Examples
///
/// ```
/// use graphcast_formats::RenderOptions;
///
/// let options = RenderOptions::new().with_indent(2);
/// assert_eq!(options.indent, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
	/// Pretty-print with this many spaces per level, where the format supports it
	pub indent: Option<usize>,
}

impl RenderOptions {
	/// Compact output
	pub fn new() -> Self {
		Self::default()
	}

	/// Indent nested levels
	pub fn with_indent(mut self, indent: usize) -> Self {
		self.indent = Some(indent);
		self
	}
}

/// Encodes a primitive tree into a wire format.
///
/// `render` consumes the tree: lazy sequences inside it are drained exactly
/// once while writing.
pub trait Renderer: Send + Sync + fmt::Debug {
	/// Format identifier used for registry lookup (e.g. `"json"`)
	fn format(&self) -> &str;

	/// Media type of the produced bytes
	fn media_type(&self) -> &str;

	/// Write the encoding of `data` to `out`
	fn render(
		&self,
		data: Primitive,
		out: &mut dyn Write,
		options: &RenderOptions,
	) -> RenderResult<()>;
}

/// Format identifier to renderer mapping.
///
/// # Examples
///
/// ```
/// use graphcast_formats::RendererRegistry;
///
/// let registry = RendererRegistry::builtin();
/// assert!(registry.get("json").is_some());
/// assert!(registry.get("toml").is_none());
/// ```
#[derive(Clone)]
pub struct RendererRegistry {
	renderers: IndexMap<String, Arc<dyn Renderer>>,
}

impl RendererRegistry {
	/// Registry without any renderer
	pub fn empty() -> Self {
		Self {
			renderers: IndexMap::new(),
		}
	}

	/// Registry holding every renderer compiled into this crate
	pub fn builtin() -> Self {
		#[allow(unused_mut)]
		let mut registry = Self::empty();
		#[cfg(feature = "xml")]
		registry.register(Arc::new(xml::XMLRenderer::new()));
		#[cfg(feature = "json")]
		registry.register(Arc::new(json::JSONRenderer::new()));
		#[cfg(feature = "yaml")]
		registry.register(Arc::new(yaml::YAMLRenderer::new()));
		#[cfg(feature = "csv")]
		registry.register(Arc::new(csv_renderer::CSVRenderer::new()));
		#[cfg(feature = "html")]
		registry.register(Arc::new(html::HTMLRenderer::new()));
		registry
	}

	/// Register a renderer under its own format identifier, replacing any
	/// previous one
	pub fn register(&mut self, renderer: Arc<dyn Renderer>) -> &mut Self {
		self.renderers
			.insert(renderer.format().to_string(), renderer);
		self
	}

	/// Builder-style [`register`](Self::register)
	pub fn with(mut self, renderer: Arc<dyn Renderer>) -> Self {
		self.register(renderer);
		self
	}

	/// Look up a renderer
	pub fn get(&self, format: &str) -> Option<Arc<dyn Renderer>> {
		self.renderers.get(format).cloned()
	}

	/// Registered format identifiers
	pub fn formats(&self) -> impl Iterator<Item = &str> {
		self.renderers.keys().map(String::as_str)
	}
}

impl Default for RendererRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}

impl fmt::Debug for RendererRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.formats()).finish()
	}
}

/// Render a tree into an in-memory buffer.
pub fn render_to_vec(
	renderer: &dyn Renderer,
	data: Primitive,
	options: &RenderOptions,
) -> RenderResult<Vec<u8>> {
	let mut buffer = Vec::new();
	renderer.render(data, &mut buffer, options)?;
	Ok(buffer)
}
