use std::io::Read;

use graphcast_types::Primitive;
use serde_json::Value;

use crate::error::{ParseError, ParseResult};
use crate::parsers::Parser;

/// JSON parser
#[derive(Debug, Clone, Default)]
pub struct JSONParser {
	/// Whether an empty input parses to null instead of failing
	pub allow_empty: bool,
}

impl JSONParser {
	/// Create a new JSONParser that rejects empty input.
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_formats::parsers::json::JSONParser;
	///
	/// let parser = JSONParser::new();
	/// assert!(!parser.allow_empty);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// # Examples
	///
	/// ```
	/// use graphcast_formats::parsers::json::JSONParser;
	///
	/// let parser = JSONParser::new().allow_empty(true);
	/// assert!(parser.allow_empty);
	/// ```
	pub fn allow_empty(mut self, allow: bool) -> Self {
		self.allow_empty = allow;
		self
	}
}

impl Parser for JSONParser {
	fn format(&self) -> &str {
		"json"
	}

	fn media_type(&self) -> &str {
		"application/json"
	}

	fn parse(&self, input: &mut dyn Read) -> ParseResult<Primitive> {
		let mut body = Vec::new();
		input.read_to_end(&mut body)?;

		if body.iter().all(u8::is_ascii_whitespace) {
			if self.allow_empty {
				return Ok(Primitive::null());
			}
			return Err(ParseError::Empty);
		}

		let value: Value = serde_json::from_slice(&body)?;
		Ok(Primitive::from_json(value))
	}
}
