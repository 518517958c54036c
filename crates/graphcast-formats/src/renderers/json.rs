use std::io::Write;

use graphcast_types::Primitive;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer as JsonWriter};

use crate::error::RenderResult;
use crate::renderers::{RenderOptions, Renderer};

/// JSON renderer
///
/// Decimals and temporal scalars are written as strings, key order follows
/// the field order of the tree.
#[derive(Debug, Clone, Default)]
pub struct JSONRenderer {
	/// Terminate the document with a newline
	pub trailing_newline: bool,
}

impl JSONRenderer {
	/// Creates a new JSON renderer
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_formats::renderers::json::JSONRenderer;
	///
	/// let renderer = JSONRenderer::new();
	/// assert!(!renderer.trailing_newline);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether a newline follows the document
	pub fn trailing_newline(mut self, enabled: bool) -> Self {
		self.trailing_newline = enabled;
		self
	}
}

impl Renderer for JSONRenderer {
	fn format(&self) -> &str {
		"json"
	}

	fn media_type(&self) -> &str {
		"application/json"
	}

	fn render(
		&self,
		data: Primitive,
		out: &mut dyn Write,
		options: &RenderOptions,
	) -> RenderResult<()> {
		let value = data.into_json()?;

		match options.indent {
			Some(width) => {
				let indent = " ".repeat(width);
				let formatter = PrettyFormatter::with_indent(indent.as_bytes());
				let mut writer = JsonWriter::with_formatter(&mut *out, formatter);
				value.serialize(&mut writer)?;
			}
			None => serde_json::to_writer(&mut *out, &value)?,
		}

		if self.trailing_newline {
			out.write_all(b"\n")?;
		}
		Ok(())
	}
}
