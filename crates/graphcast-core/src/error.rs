//! Error types for serializer entry points.

use graphcast_formats::{ParseError, RenderError};
use graphcast_types::ConfigurationError;
use thiserror::Error;

/// Errors returned by [`Serializer::serialize`](crate::Serializer::serialize)
/// and [`Serializer::deserialize`](crate::Serializer::deserialize).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SerializerError {
	/// The serializer declaration does not fit the data.
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),

	/// The renderer failed to encode the primitive tree.
	#[error("Render error: {0}")]
	Render(RenderError),

	/// The parser failed to decode the input.
	#[error("Parse error: {0}")]
	Parse(#[from] ParseError),

	/// No renderer or parser is registered under this format identifier.
	#[error("Unknown format: {0}")]
	UnknownFormat(String),

	/// The payload kind does not match the format.
	#[error("Format '{format}' does not accept {payload} input")]
	UnexpectedPayload {
		/// Requested format identifier
		format: String,
		/// Kind of payload that was supplied
		payload: &'static str,
	},
}

impl From<RenderError> for SerializerError {
	fn from(err: RenderError) -> Self {
		match err {
			RenderError::Conversion(inner) => SerializerError::Configuration(inner),
			other => SerializerError::Render(other),
		}
	}
}

/// Result type alias for serializer entry points.
pub type SerializerResult<T> = Result<T, SerializerError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_conversion_fault_during_render_is_configuration() {
		let err = SerializerError::from(RenderError::Conversion(ConfigurationError::UnboundField {
			field: "title".to_string(),
		}));
		assert!(matches!(
			err,
			SerializerError::Configuration(ConfigurationError::UnboundField { .. })
		));
	}

	#[rstest]
	fn test_io_failure_stays_render() {
		let io = std::io::Error::other("closed");
		let err = SerializerError::from(RenderError::Io(io));
		assert!(matches!(err, SerializerError::Render(_)));
		assert!(err.to_string().starts_with("Render error: IO error"));
	}
}
