//! Configuration faults raised during graph conversion.
//!
//! Every variant is a programmer error: the serializer declaration does not
//! fit the data it was asked to convert. Data-shape problems (missing keys,
//! missing attributes, cycles) never produce an error.

use thiserror::Error;

/// A serializer declaration that cannot be applied.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// A name in the `fields` allowlist is not part of the resolved field set.
	#[error("Field '{field}' is listed in `fields` but is not present on serializer '{serializer}'")]
	UnknownField { serializer: String, field: String },

	/// A field was asked to convert data before being initialised by a serializer.
	#[error("Field '{field}' was used before being bound to a serializer")]
	UnboundField { field: String },

	/// The serializer cannot derive a field set for reconstruction.
	#[error("Serializer '{serializer}' does not support deserialization")]
	DeserializationUnsupported { serializer: String },

	/// A model-backed serializer has no model to work with.
	#[error("Serializer '{serializer}' has no model bound")]
	MissingModel { serializer: String },
}

/// Result type alias for graph conversion.
pub type ConversionResult<T> = Result<T, ConfigurationError>;
