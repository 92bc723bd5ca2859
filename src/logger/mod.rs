//! Logger module
//!
//! Logging utilities for the asset server: lifecycle lines, access logging,
//! warnings and errors. Before `init` runs, output goes to stdout/stderr.

pub mod writer;

use std::net::SocketAddr;

use chrono::Local;

/// Initialize the logger with optional access/error log file paths.
///
/// Should be called once at application startup.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> std::io::Result<()> {
    writer::init(access_log_file, error_log_file)
}

fn write_access(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn timestamp() -> String {
    Local::now().format("%d/%b/%Y:%H:%M:%S %z").to_string()
}

pub fn log_server_start(addr: &SocketAddr, root: &std::path::Path) {
    write_access("======================================");
    write_access("Asset server started successfully");
    write_access(&format!("Listening on: http://{addr}"));
    write_access(&format!("Serving assets from: {}", root.display()));
    write_access("======================================");
}

pub fn log_request(method: &hyper::Method, uri: &hyper::Uri, version: hyper::Version) {
    write_access(&format!("[{}] \"{method} {uri} {version:?}\"", timestamp()));
}

pub fn log_response(status: u16) {
    write_access(&format!("[{}] → {status}", timestamp()));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}
