//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: Reads the gate settings from the environment
//! 2. **Client Creation**: Builds the 3scale client
//! 3. **State Creation**: Wraps config, client and decision cache in `AppState`
//! 4. **Router Creation**: Configures all routes and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use webservices::backend::server::{config::load_config, create_app};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(load_config()?)?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use state::AppState;
pub use init::{create_app, create_app_with_client};
