//! Authorization Client Module
//!
//! The request gate talks to the metering service through the
//! `AuthorizationClient` trait. `ThreeScaleClient` is the production
//! implementation backed by the 3scale service management API.
//!
//! # Module Structure
//!
//! ```text
//! threescale/
//! ├── mod.rs      - Module exports
//! ├── client.rs   - Trait, request and verdict types
//! └── authrep.rs  - reqwest implementation of the authrep call
//! ```

pub mod client;
pub mod authrep;

pub use client::{
    AuthorizationClient, AuthorizationError, AuthorizationRequest, Authorized, Denial, Verdict,
};
pub use authrep::ThreeScaleClient;
