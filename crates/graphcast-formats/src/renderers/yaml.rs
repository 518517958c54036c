use std::io::Write;

use graphcast_types::Primitive;

use crate::error::RenderResult;
use crate::renderers::{RenderOptions, Renderer};

/// YAML renderer
///
/// Block style output; mapping order follows the field order of the tree.
#[derive(Debug, Clone, Default)]
pub struct YAMLRenderer;

impl YAMLRenderer {
	/// Creates a new YAML renderer
	pub fn new() -> Self {
		Self
	}
}

impl Renderer for YAMLRenderer {
	fn format(&self) -> &str {
		"yaml"
	}

	fn media_type(&self) -> &str {
		"application/yaml"
	}

	fn render(
		&self,
		data: Primitive,
		out: &mut dyn Write,
		_options: &RenderOptions,
	) -> RenderResult<()> {
		let value = data.into_json()?;
		serde_yaml::to_writer(out, &value)?;
		Ok(())
	}
}
