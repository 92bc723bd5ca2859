//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! asset pipeline's decision logic.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{build_304_response, build_404_response, build_500_response};
