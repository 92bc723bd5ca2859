//! Asset request pipeline
//!
//! Resolves a request to a file on disk, validates the client's cached copy,
//! optionally transforms script/style sources, and assembles the response.
//!
//! [`serve`] returns `None` whenever no asset matches (filtered path, unknown
//! content type, missing file, non-regular file); [`handle`] maps that case
//! to a caller-supplied fallback. Failures other than not-found never reach
//! the fallback: they terminate the pipeline with a 500.

use std::io;
use std::path::{Component, Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{header, Request, Response};
use tokio::fs;

use super::options::AssetOptions;
use crate::http::{self, cache, mime, response};
use crate::logger;
use crate::transform::{self, engine, Loader};

/// Handle one request: serve a matching asset or delegate to `fallback`.
pub async fn handle<B, F>(
    req: &Request<B>,
    options: &AssetOptions,
    fallback: F,
) -> Response<Full<Bytes>>
where
    F: FnOnce(&Request<B>) -> Response<Full<Bytes>>,
{
    match serve(req, options).await {
        Some(response) => response,
        None => fallback(req),
    }
}

/// Run the pipeline; `None` means "no asset matched, ask the fallback".
pub async fn serve<B>(req: &Request<B>, options: &AssetOptions) -> Option<Response<Full<Bytes>>> {
    let pathname = req.uri().path();

    // Hidden files and ignored prefixes never reach the filesystem.
    if pathname.starts_with("/.")
        || options
            .ignore
            .iter()
            .any(|prefix| pathname.starts_with(prefix.as_str()))
    {
        return None;
    }

    // Unknown content types are never served as assets, even if the file
    // exists on disk.
    let content_type = mime::lookup(pathname)?;

    let file_path = resolve_path(&options.root, pathname)?;
    let metadata = match fs::symlink_metadata(&file_path).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            logger::log_error(&format!(
                "stat failed for '{}': {err}",
                file_path.display()
            ));
            return Some(http::build_500_response(&err.to_string()));
        }
    };
    if !metadata.is_file() {
        return None;
    }

    // Transform eligibility and per-request option resolution.
    let resolved = Loader::from_path(pathname)
        .filter(|_| options.transform.matches(pathname))
        .map(|loader| {
            transform::resolve(
                &options.transform_options,
                loader,
                pathname,
                header_str(req, &header::USER_AGENT),
                is_local_origin(req),
            )
        });

    // The validator must change with the transform target: the same file
    // compiled for a different browser is not cache-equivalent.
    let etag = cache::validator(
        metadata.modified().ok(),
        metadata.len(),
        pathname,
        resolved.as_ref().map(|r| r.target.as_str()),
    );
    if let Some(etag) = etag.as_deref() {
        if cache::matches(header_str(req, &header::IF_NONE_MATCH), etag) {
            return Some(http::build_304_response());
        }
    }

    let response = match resolved {
        None => {
            let content = match fs::read(&file_path).await {
                Ok(content) => content,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
                Err(err) => {
                    logger::log_error(&format!(
                        "read failed for '{}': {err}",
                        file_path.display()
                    ));
                    return Some(http::build_500_response(&err.to_string()));
                }
            };
            response::build_asset_response(
                Bytes::from(content),
                &content_type,
                etag.as_deref(),
                metadata.modified().ok(),
            )
        }
        Some(resolved) => {
            let source = match fs::read_to_string(&file_path).await {
                Ok(source) => source,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
                Err(err) => {
                    logger::log_error(&format!(
                        "read failed for '{}': {err}",
                        file_path.display()
                    ));
                    return Some(http::build_500_response(&err.to_string()));
                }
            };
            match engine::transform(&source, &resolved) {
                Ok(code) => {
                    // Compiled scripts are served as JavaScript; stylesheets
                    // keep their CSS content type.
                    let content_type = if resolved.loader == Loader::Css {
                        content_type
                    } else {
                        "application/javascript; charset=utf-8".to_string()
                    };
                    response::build_asset_response(
                        Bytes::from(code),
                        &content_type,
                        etag.as_deref(),
                        None,
                    )
                }
                Err(err) => {
                    logger::log_error(&format!("transform failed for '{pathname}': {err}"));
                    http::build_500_response(&err.to_string())
                }
            }
        }
    };
    Some(response)
}

/// Join the request path onto the root, refusing `..` traversal.
fn resolve_path(root: &Path, pathname: &str) -> Option<PathBuf> {
    let relative = Path::new(pathname.trim_start_matches('/'));
    if relative
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {pathname}"));
        return None;
    }
    Some(root.join(relative))
}

fn header_str<'a, B>(req: &'a Request<B>, name: &header::HeaderName) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// True when the request addresses a loopback host.
fn is_local_origin<B>(req: &Request<B>) -> bool {
    request_host(req).is_some_and(is_local_host)
}

fn request_host<B>(req: &Request<B>) -> Option<&str> {
    req.uri()
        .host()
        .or_else(|| header_str(req, &header::HOST))
}

fn is_local_host(host: &str) -> bool {
    matches!(strip_port(host), "localhost" | "127.0.0.1" | "::1")
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(rest, |(inner, _)| inner);
    }
    // More than one colon means a bare IPv6 literal, not host:port.
    if host.matches(':').count() == 1 {
        if let Some((name, port)) = host.rsplit_once(':') {
            if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) {
                return name;
            }
        }
    }
    host
}
