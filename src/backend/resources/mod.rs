//! Webservice Resources Module
//!
//! Demo API endpoints served behind the request gate.

pub mod handlers;

pub use handlers::{index, ping, show, update};
