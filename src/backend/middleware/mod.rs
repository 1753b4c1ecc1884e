//! Middleware Module
//!
//! Request processing that wraps the API handlers.
//!
//! # Architecture
//!
//! - **`authenticate`** - The request gate: bypass check, decision cache,
//!   authorization client
//! - **`rescue`** - Renders raised `ApiError`s and caught panics
//! - **`params`** - Ordered request parameters (query and body), their
//!   collecting middleware and extractor
//!
//! # Layer Order
//!
//! ```text
//! rescue -> catch panic -> collect_params -> authenticate -> handler
//! ```

pub mod authenticate;
pub mod params;
pub mod rescue;

pub use authenticate::{authenticate, Authorization};
pub use params::{collect_params, params_of, request_params, ApiParams};
pub use rescue::{handle_panic, rescue};
