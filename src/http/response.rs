//! HTTP response building module
//!
//! Builders for the status codes the asset pipeline emits, decoupled from
//! the pipeline's decision logic.

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::time::SystemTime;

/// Build a 200 response for a served asset.
///
/// `Content-Type` is always present; `ETag` and `Last-Modified` only when the
/// pipeline produced them.
pub fn build_asset_response(
    body: Bytes,
    content_type: &str,
    etag: Option<&str>,
    last_modified: Option<SystemTime>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", body.len());

    if let Some(etag) = etag {
        builder = builder.header("ETag", etag);
    }
    if let Some(mtime) = last_modified {
        builder = builder.header("Last-Modified", http_date(mtime));
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build a bare 304 Not Modified response: no body, no content headers.
pub fn build_304_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the generic 404 Not Found response used when no fallback is given.
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("Not Found")))
        })
}

/// Build a 500 response carrying a failure's message.
pub fn build_500_response(message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(message.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Format a timestamp as an RFC 7231 HTTP date (`Last-Modified` value).
fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
