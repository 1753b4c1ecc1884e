//! Backend Module
//!
//! All server-side code for the webservices gate. This module is only
//! compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`middleware`** - Request gate, parameter extraction, error rescue
//! - **`threescale`** - Authorization client trait and the 3scale implementation
//! - **`cache`** - Time-bounded cache of authorization decisions
//! - **`response`** - Format negotiation and response emission
//! - **`resources`** - Demo API endpoints behind the gate
//! - **`error`** - Backend error types and their HTTP translation
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── middleware/     - Request middleware
//! ├── threescale/     - Authorization client
//! ├── cache.rs        - Decision cache
//! ├── response/       - Format negotiation and emission
//! ├── resources/      - Demo endpoints
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! TraceLayer -> rescue -> CatchPanic -> collect_params -> authenticate -> handler
//! ```
//!
//! `authenticate` builds the ordered parameter list, looks the cache key up in
//! the decision cache and asks the authorization client on a miss. Failures
//! travel back up as `ApiError` and `rescue` renders them in the negotiated
//! format.
//!
//! # State Management
//!
//! `AppState` holds the configuration, the authorization client and the
//! decision cache. The cache is the only mutable shared state and carries its
//! own lock.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

/// Authorization decision cache
pub mod cache;

/// 3scale authorization client
pub mod threescale;

/// Format negotiation and response emission
pub mod response;

/// Demo API endpoints
pub mod resources;

pub use cache::DecisionCache;
pub use error::{ApiError, StartupError};
pub use server::{create_app, create_app_with_client, AppState};
