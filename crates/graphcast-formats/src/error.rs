//! Error types for renderers and parsers.

use graphcast_types::ConfigurationError;
use thiserror::Error;

/// Errors raised while encoding a primitive tree.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RenderError {
	/// Writing to the output stream failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON encoding failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// YAML encoding failed.
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	Yaml(#[from] serde_yaml::Error),

	/// CSV encoding failed.
	#[cfg(feature = "csv")]
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	/// XML encoding failed.
	#[error("XML error: {0}")]
	Xml(String),

	/// The tree has a shape the format cannot represent.
	#[error("{format} renderer cannot encode {reason}")]
	Unsupported {
		/// Format identifier
		format: &'static str,
		/// What was rejected
		reason: String,
	},

	/// A lazy sequence element could not be produced while rendering.
	#[error(transparent)]
	Conversion(#[from] ConfigurationError),
}

/// Errors raised while decoding a byte stream.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParseError {
	/// Reading from the input stream failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The input is not valid JSON.
	#[error("Invalid JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// The input is not valid YAML.
	#[cfg(feature = "yaml")]
	#[error("Invalid YAML: {0}")]
	Yaml(#[from] serde_yaml::Error),

	/// The input was empty and the parser does not accept empty bodies.
	#[error("Empty input")]
	Empty,
}

/// Result type alias for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type alias for parsing.
pub type ParseResult<T> = Result<T, ParseError>;
