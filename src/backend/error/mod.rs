//! Backend Error Module
//!
//! This module defines the errors raised while serving API requests and how
//! they become HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! ├── translator.rs - Error to body/status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # HTTP Response Conversion
//!
//! `ApiError` implements `IntoResponse`, so handlers can return
//! `Result<T, ApiError>`. The rescue middleware renders the final body using
//! the translator table and the caller's requested format.

/// Error type definitions
pub mod types;

/// Error to response mapping
pub mod translator;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{ApiError, StartupError};
pub use translator::{translate, ErrorResponse, REDACTED_MESSAGE};
pub use conversion::RaisedError;
