//! Static-asset request handler for hyper-based servers.
//!
//! Given an incoming request, the pipeline resolves a file under a configured
//! root, validates the client's cached copy via a weak `ETag`, optionally
//! compiles script/style sources for the requesting browser, and produces a
//! response — or yields to a fallback handler when no asset matches.
//!
//! ```no_run
//! use asset_server::{handler, http, AssetOptions, TransformMode};
//! use hyper::Request;
//!
//! # async fn example(req: Request<()>) {
//! let options = AssetOptions {
//!     root: "./public".into(),
//!     transform: TransformMode::All,
//!     ..AssetOptions::default()
//! };
//! let response = handler::handle(&req, &options, |_| http::build_404_response()).await;
//! # let _ = response;
//! # }
//! ```

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod transform;

pub use handler::{handle, serve, AssetOptions, TransformMode};
pub use http::mime::register_type;
pub use transform::TransformConfig;
