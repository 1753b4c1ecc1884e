//! Response Module
//!
//! Content negotiation and emission of `{type: message}` bodies.
//!
//! # Module Structure
//!
//! ```text
//! response/
//! ├── mod.rs        - Module exports
//! ├── negotiate.rs  - Requested format resolution and extractor
//! └── emitter.rs    - Serialization into axum responses
//! ```

pub mod negotiate;
pub mod emitter;

pub use negotiate::{negotiate, NotAcceptable, RequestedFormat};
pub use emitter::{emit, emit_value, show_error, show_success};
