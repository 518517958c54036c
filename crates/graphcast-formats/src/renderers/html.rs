use std::io::Write;

use graphcast_types::Primitive;

use crate::error::RenderResult;
use crate::renderers::{RenderOptions, Renderer};

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use graphcast_formats::renderers::html::escape_html;
///
/// assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
	input
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// HTML fragment renderer
///
/// Mappings become definition lists, sequences become unordered lists and
/// scalars are written as escaped text.
#[derive(Debug, Clone, Default)]
pub struct HTMLRenderer {
	/// `class` attribute put on the outermost element
	pub css_class: Option<String>,
}

impl HTMLRenderer {
	/// Creates a new HTML renderer
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the class of the outermost element
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_formats::renderers::html::HTMLRenderer;
	///
	/// let renderer = HTMLRenderer::new().css_class("object");
	/// assert_eq!(renderer.css_class.as_deref(), Some("object"));
	/// ```
	pub fn css_class(mut self, class: impl Into<String>) -> Self {
		self.css_class = Some(class.into());
		self
	}

	fn open(&self, out: &mut dyn Write, tag: &str, outermost: bool) -> RenderResult<()> {
		match (&self.css_class, outermost) {
			(Some(class), true) => write!(out, "<{} class=\"{}\">", tag, escape_html(class))?,
			_ => write!(out, "<{}>", tag)?,
		}
		Ok(())
	}

	fn write_value(&self, out: &mut dyn Write, value: Primitive, outermost: bool) -> RenderResult<()> {
		match value {
			Primitive::Scalar(scalar) => {
				out.write_all(escape_html(&scalar.to_string()).as_bytes())?;
			}
			Primitive::Mapping(map) => {
				self.open(out, "dl", outermost)?;
				for (key, entry) in map {
					write!(out, "<dt>{}</dt><dd>", escape_html(&key))?;
					self.write_value(out, entry.value, false)?;
					out.write_all(b"</dd>")?;
				}
				out.write_all(b"</dl>")?;
			}
			Primitive::Sequence(items) => {
				self.open(out, "ul", outermost)?;
				for item in items {
					out.write_all(b"<li>")?;
					self.write_value(out, item?, false)?;
					out.write_all(b"</li>")?;
				}
				out.write_all(b"</ul>")?;
			}
		}
		Ok(())
	}
}

impl Renderer for HTMLRenderer {
	fn format(&self) -> &str {
		"html"
	}

	fn media_type(&self) -> &str {
		"text/html; charset=utf-8"
	}

	fn render(
		&self,
		data: Primitive,
		out: &mut dyn Write,
		_options: &RenderOptions,
	) -> RenderResult<()> {
		self.write_value(out, data, true)
	}
}
