//! Webservices - API Authorization Gate
//!
//! Webservices sits in front of an HTTP API and meters every call against the
//! 3scale service management API before the request reaches application code.
//!
//! # Overview
//!
//! This library provides:
//! - A request gate (axum middleware) that authorizes each API call
//! - A short-lived decision cache so identical requests skip the remote call
//! - A 3scale authorization client
//! - Translation of authorization failures into `{"error": "..."}` responses
//! - Content-negotiated response emission (JSON, XML, HTML-as-JSON)
//!
//! # Module Structure
//!
//! - **`shared`** - Transport-agnostic types
//!   - Configuration (`WebservicesConfig`)
//!   - Ordered request parameters and cache keys
//!   - Response bodies and formats
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Request gate and error rescue middleware
//!   - Decision cache
//!   - 3scale client
//!   - Router and demo API endpoints
//!
//! # Usage
//!
//! ```rust,no_run
//! use webservices::backend::server::init::create_app;
//! use webservices::shared::WebservicesConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WebservicesConfig::from_env()?;
//! let app = create_app(config)?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - Authorization failures are typed (`ApiError`, `AuthorizationError`)
//! - Every failure raised below the rescue middleware is rendered as a
//!   structured response; nothing escapes as a raw fault

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
