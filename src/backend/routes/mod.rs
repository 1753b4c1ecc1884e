//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - Gated API routes and their layers
//! ```

/// Main router creation
pub mod router;

/// Gated API routes
pub mod api_routes;

pub use router::create_router;
pub use api_routes::{configure_api_routes, protect};
