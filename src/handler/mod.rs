//! Request handling module
//!
//! The asset pipeline and its per-call options.

pub mod assets;
mod options;

pub use assets::{handle, serve};
pub use options::{AssetOptions, TransformMode};
