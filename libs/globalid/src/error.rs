//! Error types for registration, encoding and decoding.

use thiserror::Error;

/// Errors that can occur when registering, encoding or decoding global IDs.
///
/// Every variant is a local validation failure; none of them is retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GlobalIdError {
    /// The type name is already mapped to a prefix.
    #[error("type is already registered: {type_name}")]
    DuplicateType { type_name: String },

    /// The prefix is already mapped to a type.
    #[error("prefix is already registered: {prefix}")]
    DuplicatePrefix { prefix: String },

    /// A parser is already registered for this prefix and version.
    #[error("parser already registered for prefix '{prefix}' and version '{version}'")]
    DuplicateVersion { prefix: String, version: String },

    /// The prefix cannot be used on the wire.
    #[error("invalid prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    /// No mapping exists for the type.
    ///
    /// On encode `name` is the requested type name; on decode it is the
    /// prefix that had no type behind it.
    #[error("type is not registered: {name}")]
    UnknownType { name: String },

    /// No parser (or type) is registered for the prefix.
    #[error("no parsers registered for prefix: {prefix}")]
    UnknownPrefix { prefix: String },

    /// The prefix is known but has no parser for this version.
    #[error("no parser registered for prefix '{prefix}' and version '{version}'")]
    UnknownVersion { prefix: String, version: String },

    /// No parser factory exists under this name.
    #[error("unknown parser: {name}")]
    UnknownParser { name: String },

    /// The encoded string is malformed.
    #[error("invalid encoded ID format: {message}")]
    InvalidFormat { message: String },

    /// A parser rejected its input.
    #[error("malformed value: {message}")]
    MalformedValue { message: String },

    /// Encode was called without a value.
    #[error("value is not defined")]
    MissingValue,

    /// The caller's value type differs from the parser's value type.
    #[error("value type mismatch: parser handles {parser_type}, got {requested_type}")]
    ValueTypeMismatch {
        parser_type: &'static str,
        requested_type: &'static str,
    },

    /// The binary payload codec failed on well-formed input.
    #[error("payload encoding failed: {message}")]
    EncodingFailure { message: String },
}

impl GlobalIdError {
    /// Creates an [`GlobalIdError::InvalidFormat`] error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates a [`GlobalIdError::MalformedValue`] error.
    ///
    /// Parser implementations use this to reject input.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedValue {
            message: message.into(),
        }
    }

    /// Returns true if this error was raised while registering a type or parser.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            GlobalIdError::DuplicateType { .. }
                | GlobalIdError::DuplicatePrefix { .. }
                | GlobalIdError::DuplicateVersion { .. }
                | GlobalIdError::InvalidPrefix { .. }
        )
    }

    /// Returns true if a registry lookup missed.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            GlobalIdError::UnknownType { .. }
                | GlobalIdError::UnknownPrefix { .. }
                | GlobalIdError::UnknownVersion { .. }
                | GlobalIdError::UnknownParser { .. }
        )
    }

    /// Returns true if the encoded string or its value could not be read.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            GlobalIdError::InvalidFormat { .. } | GlobalIdError::MalformedValue { .. }
        )
    }
}
