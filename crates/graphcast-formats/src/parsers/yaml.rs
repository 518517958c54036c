use std::io::Read;

use graphcast_types::Primitive;
use serde_json::Value;

use crate::error::ParseResult;
use crate::parsers::Parser;

/// YAML parser
///
/// Documents are decoded through the JSON data model, so only string keys
/// are accepted.
#[derive(Debug, Clone, Default)]
pub struct YAMLParser;

impl YAMLParser {
	/// Creates a new YAML parser
	pub fn new() -> Self {
		Self
	}
}

impl Parser for YAMLParser {
	fn format(&self) -> &str {
		"yaml"
	}

	fn media_type(&self) -> &str {
		"application/yaml"
	}

	fn parse(&self, input: &mut dyn Read) -> ParseResult<Primitive> {
		let value: Value = serde_yaml::from_reader(input)?;
		Ok(Primitive::from_json(value))
	}
}
