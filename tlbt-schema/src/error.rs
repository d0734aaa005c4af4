//! Error types for schema loading and type resolution.

use thiserror::Error;

/// Error type for schema loading and type-string parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON syntax or shape error, with the path of the offending value.
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_path_to_error::Error<serde_json::Error>),

    /// Trailing or otherwise malformed JSON outside the document value.
    #[error("invalid schema JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed parameter type string.
    #[error("invalid type '{raw}' at position {position}: {message}")]
    InvalidType {
        /// The raw type string.
        raw: String,
        /// Byte offset of the failure.
        position: usize,
        /// What was expected.
        message: String,
    },

    /// Flag bit outside the 32-bit flags word.
    #[error("flag bit {bit} out of range 0..=31 in type '{raw}'")]
    FlagBitOutOfRange {
        /// The raw type string.
        raw: String,
        /// The parsed bit number.
        bit: u64,
    },
}

/// Error type for schema resolution.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A constructor parameter whose type string could not be parsed.
    #[error("constructor '{predicate}', param '{param}': {source}")]
    InvalidParam {
        /// Constructor predicate.
        predicate: String,
        /// Parameter name.
        param: String,
        /// Underlying parse error.
        #[source]
        source: ParseError,
    },
}

impl ParseError {
    /// Creates an invalid type error.
    pub fn invalid_type(
        raw: impl Into<String>,
        position: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            raw: raw.into(),
            position,
            message: message.into(),
        }
    }
}
