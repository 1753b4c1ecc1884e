//! Shared Module
//!
//! This module contains types that do not depend on the HTTP server:
//! configuration, request parameters and the `{type: message}` response body.
//!
//! # Overview
//!
//! Everything here is plain data plus serialization, so it can be used by
//! the backend, by tests, and by tooling without pulling in axum.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Ordered request parameters and cache keys
pub mod params;

/// Response bodies and representation formats
pub mod response;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use config::{ConfigError, RuntimeMode, WebservicesConfig, WebservicesConfigBuilder};
pub use params::RequestParams;
pub use response::{ResponseBody, ResponseFormat};
