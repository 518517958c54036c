//! XML renderer
//!
//! Writes the tree as nested elements under a single root element. Mapping
//! keys become element names, sequence elements become `<list-item>`
//! elements, null scalars become empty elements. A key that is not a valid
//! XML name (a free-text label such as `Full Name`) is written as
//! `<field name="Full Name">`.

use std::fmt;
use std::io::Write;

use graphcast_types::Primitive;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{RenderError, RenderResult};
use crate::renderers::{RenderOptions, Renderer};

/// XML renderer
#[derive(Debug, Clone)]
pub struct XMLRenderer {
	/// Name of the document element (default: "root")
	pub root_tag: String,
	/// Name of sequence element wrappers (default: "list-item")
	pub item_tag: String,
	/// Element used for keys that are not valid XML names (default: "field")
	pub field_tag: String,
}

impl Default for XMLRenderer {
	fn default() -> Self {
		Self {
			root_tag: "root".to_string(),
			item_tag: "list-item".to_string(),
			field_tag: "field".to_string(),
		}
	}
}

impl XMLRenderer {
	/// Creates a new XML renderer
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_formats::renderers::xml::XMLRenderer;
	///
	/// let renderer = XMLRenderer::new();
	/// assert_eq!(renderer.root_tag, "root");
	/// assert_eq!(renderer.item_tag, "list-item");
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the document element name
	pub fn root_tag(mut self, tag: impl Into<String>) -> Self {
		self.root_tag = tag.into();
		self
	}

	/// Sets the sequence element name
	pub fn item_tag(mut self, tag: impl Into<String>) -> Self {
		self.item_tag = tag.into();
		self
	}

	/// Sets the element used for keys that are not valid XML names
	pub fn field_tag(mut self, tag: impl Into<String>) -> Self {
		self.field_tag = tag.into();
		self
	}

	fn write_element<W: Write>(
		&self,
		writer: &mut Writer<W>,
		name: &str,
		value: Primitive,
	) -> RenderResult<()> {
		let (tag, start) = if is_xml_name(name) {
			(name, BytesStart::new(name))
		} else {
			let tag = self.field_tag.as_str();
			(tag, BytesStart::new(tag).with_attributes([("name", name)]))
		};

		if value.is_null() {
			writer
				.write_event(Event::Empty(start))
				.map_err(xml_error)?;
			return Ok(());
		}

		writer
			.write_event(Event::Start(start))
			.map_err(xml_error)?;
		self.write_content(writer, value)?;
		writer
			.write_event(Event::End(BytesEnd::new(tag)))
			.map_err(xml_error)?;
		Ok(())
	}

	fn write_content<W: Write>(&self, writer: &mut Writer<W>, value: Primitive) -> RenderResult<()> {
		match value {
			Primitive::Scalar(scalar) => {
				let text = scalar.to_string();
				if !text.is_empty() {
					writer
						.write_event(Event::Text(BytesText::new(&text)))
						.map_err(xml_error)?;
				}
			}
			Primitive::Mapping(map) => {
				for (key, entry) in map {
					self.write_element(writer, &key, entry.value)?;
				}
			}
			Primitive::Sequence(items) => {
				for item in items {
					self.write_element(writer, &self.item_tag, item?)?;
				}
			}
		}
		Ok(())
	}
}

/// Whether `name` can be used as an element name as-is.
fn is_xml_name(name: &str) -> bool {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return false;
	};
	(first.is_alphabetic() || first == '_')
		&& chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn xml_error(err: impl fmt::Display) -> RenderError {
	RenderError::Xml(err.to_string())
}

impl Renderer for XMLRenderer {
	fn format(&self) -> &str {
		"xml"
	}

	fn media_type(&self) -> &str {
		"application/xml"
	}

	fn render(
		&self,
		data: Primitive,
		out: &mut dyn Write,
		options: &RenderOptions,
	) -> RenderResult<()> {
		let mut writer = match options.indent {
			Some(width) => Writer::new_with_indent(&mut *out, b' ', width),
			None => Writer::new(&mut *out),
		};

		writer
			.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
			.map_err(xml_error)?;
		self.write_element(&mut writer, &self.root_tag, data)
	}
}
