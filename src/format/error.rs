//! Error types for marker import/export.

use thiserror::Error;

/// Errors that can occur while importing or exporting a marker set.
///
/// Any of these aborts an import as a whole; the previously loaded markers
/// are kept untouched.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error (includes missing fields and
    /// values of the wrong type)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid document structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// A record is stored under a key that differs from its `id` field
    #[error("Marker stored under key '{key}' has id '{id}'")]
    IdMismatch {
        /// The object key
        key: String,
        /// The id field of the record
        id: String,
    },

    /// The same marker id appears more than once
    #[error("Duplicate marker id: {id}")]
    DuplicateId {
        /// The repeated id
        id: String,
    },

    /// A color channel is outside `0..=255`
    #[error("Color channel '{channel}' of marker '{id}' is out of range: {value}")]
    ColorOutOfRange {
        /// Marker the color belongs to
        id: String,
        /// Channel name (`r`, `g` or `b`)
        channel: &'static str,
        /// The offending value
        value: i64,
    },

    /// Position or size is negative or not a finite number
    #[error("Invalid geometry for marker '{id}': {message}")]
    InvalidGeometry {
        /// Marker the rectangle belongs to
        id: String,
        /// Description of the problem
        message: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Whether the error came from the document content rather than from
    /// the file system.
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
