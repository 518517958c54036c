//! Parsers: byte stream to primitive tree.

#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "yaml")]
pub mod yaml;

use crate::error::ParseResult;
use graphcast_types::Primitive;
use indexmap::IndexMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

/// Decodes a wire format into a primitive tree.
pub trait Parser: Send + Sync + fmt::Debug {
	/// Format identifier used for registry lookup (e.g. `"json"`)
	fn format(&self) -> &str;

	/// Media type this parser accepts
	fn media_type(&self) -> &str;

	/// Read the whole input and decode it
	fn parse(&self, input: &mut dyn Read) -> ParseResult<Primitive>;
}

/// Format identifier to parser mapping.
///
/// # Examples
///
/// ```
/// use graphcast_formats::ParserRegistry;
///
/// let registry = ParserRegistry::builtin();
/// assert!(registry.get("json").is_some());
/// assert!(registry.get("csv").is_none());
/// ```
#[derive(Clone)]
pub struct ParserRegistry {
	parsers: IndexMap<String, Arc<dyn Parser>>,
}

impl ParserRegistry {
	/// Registry without any parser
	pub fn empty() -> Self {
		Self {
			parsers: IndexMap::new(),
		}
	}

	/// Registry holding every parser compiled into this crate
	pub fn builtin() -> Self {
		#[allow(unused_mut)]
		let mut registry = Self::empty();
		#[cfg(feature = "json")]
		registry.register(Arc::new(json::JSONParser::new()));
		#[cfg(feature = "yaml")]
		registry.register(Arc::new(yaml::YAMLParser::new()));
		registry
	}

	/// Register a parser under its own format identifier, replacing any
	/// previous one
	pub fn register(&mut self, parser: Arc<dyn Parser>) -> &mut Self {
		self.parsers.insert(parser.format().to_string(), parser);
		self
	}

	/// Builder-style [`register`](Self::register)
	pub fn with(mut self, parser: Arc<dyn Parser>) -> Self {
		self.register(parser);
		self
	}

	/// Look up a parser
	pub fn get(&self, format: &str) -> Option<Arc<dyn Parser>> {
		self.parsers.get(format).cloned()
	}

	/// Registered format identifiers
	pub fn formats(&self) -> impl Iterator<Item = &str> {
		self.parsers.keys().map(String::as_str)
	}
}

impl Default for ParserRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}

impl fmt::Debug for ParserRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.formats()).finish()
	}
}

/// Parse an in-memory buffer.
pub fn parse_slice(parser: &dyn Parser, mut input: &[u8]) -> ParseResult<Primitive> {
	parser.parse(&mut input)
}
