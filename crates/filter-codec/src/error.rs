//! Error types for filter string decoding and the JSON helpers.

use thiserror::Error;

/// Errors that can occur while decoding a filter string or converting
/// filter records.
///
/// Every parse variant carries the 0-based byte offset into the input at
/// which the problem was detected.
#[derive(Error, Debug)]
pub enum FilterError {
    /// The input ended while a `(` was still open, or a stray `)` appeared.
    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParens { position: usize },

    /// A group, payload, or set tag that the grammar does not know
    /// (or that is not allowed at this place).
    #[error("unknown tag '{tag}' at position {position}")]
    UnknownTag { position: usize, tag: String },

    /// A runset or column index that is not a non-negative integer.
    #[error("invalid index '{segment}' at position {position}")]
    InvalidIndex { position: usize, segment: String },

    /// Any other structural violation of the filter grammar.
    #[error("malformed filter string at position {position}: {message}")]
    Malformed { position: usize, message: String },

    /// A table filter record whose id cannot be decomposed.
    #[error("invalid table filter: {0}")]
    InvalidTableFilter(String),

    /// JSON input for a domain registry or predicate list was invalid.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FilterError {
    /// Byte offset of a parse error, `None` for the non-parse variants.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnbalancedParens { position }
            | Self::UnknownTag { position, .. }
            | Self::InvalidIndex { position, .. }
            | Self::Malformed { position, .. } => Some(*position),
            Self::InvalidTableFilter(_) | Self::Json(_) => None,
        }
    }
}

/// Convenience alias used throughout filter-codec.
pub type Result<T> = std::result::Result<T, FilterError>;
