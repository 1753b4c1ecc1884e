//! Shared Error Types
//!
//! Errors raised while turning response bodies into bytes or while resolving
//! a requested representation format.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON/XML serialization failures
//! - `UnsupportedFormat` - The caller asked for a format we cannot produce
//!
//! # Usage
//!
//! ```rust
//! use webservices::shared::error::SharedError;
//!
//! let error = SharedError::unsupported_format("csv");
//! assert!(error.to_string().contains("csv"));
//! ```
use thiserror::Error;

/// Errors produced by the shared response types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON or XML serialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Requested representation is not one of JSON, XML or HTML
    #[error("Unsupported response format: {format}")]
    UnsupportedFormat {
        /// The format as the caller spelled it
        format: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
