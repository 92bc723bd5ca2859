//! HTTP cache control module
//!
//! Provides weak validator (`ETag`) construction and conditional request
//! handling for the asset pipeline.
//!
//! A validator certifies a specific version of an asset: it changes whenever
//! the file's modification time or size changes, and — for transform-eligible
//! assets — whenever the resolved transform target changes, so the same file
//! compiled for two different browsers is never treated as cache-equivalent.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment variable consulted when a file has no usable mtime
/// (e.g. ephemeral deployment snapshots). Expected to change on every deploy.
pub const DEPLOYMENT_ID_VAR: &str = "DEPLOYMENT_ID";

/// Build the weak validator for an asset.
///
/// * With an mtime: `W/<mtime_ms_hex>-<size_hex>[-<target>]`.
/// * Without one, but with a deployment identifier in the environment:
///   `W/<path_hash_hex>-<deploy_id>[-<target>]`.
/// * Without either: `None` — conditional caching is silently disabled.
pub fn validator(
    mtime: Option<SystemTime>,
    size: u64,
    path: &str,
    target: Option<&str>,
) -> Option<String> {
    let deploy_id = std::env::var(DEPLOYMENT_ID_VAR).ok();
    build_validator(mtime, size, path, target, deploy_id.as_deref())
}

fn build_validator(
    mtime: Option<SystemTime>,
    size: u64,
    path: &str,
    target: Option<&str>,
    deploy_id: Option<&str>,
) -> Option<String> {
    let mut etag = match mtime.and_then(|t| t.duration_since(UNIX_EPOCH).ok()) {
        Some(elapsed) => format!("W/{:x}-{size:x}", elapsed.as_millis()),
        None => {
            let deploy_id = deploy_id?;
            format!("W/{:x}-{deploy_id}", hash_path(path))
        }
    };
    if let Some(target) = target {
        etag.push('-');
        etag.push_str(target);
    }
    Some(etag)
}

/// Deterministic digest of the request path.
///
/// `DefaultHasher::new()` uses fixed keys, so the digest is stable across
/// restarts of the same build — the deployment identifier carries the
/// per-deploy variation.
fn hash_path(path: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}

/// Check whether the client's `If-None-Match` header revalidates `etag`.
///
/// The validator is opaque: the comparison is exact string equality.
pub fn matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match == Some(etag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn mtime(ms: u64) -> Option<SystemTime> {
        Some(UNIX_EPOCH + Duration::from_millis(ms))
    }

    #[test]
    fn test_validator_from_metadata() {
        let etag = build_validator(mtime(0x1234), 0xff, "/a.txt", None, None).unwrap();
        assert_eq!(etag, "W/1234-ff");
    }

    #[test]
    fn test_validator_deterministic() {
        let a = build_validator(mtime(1000), 42, "/a.txt", None, None);
        let b = build_validator(mtime(1000), 42, "/a.txt", None, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_validator_tracks_mtime_and_size() {
        let base = build_validator(mtime(1000), 42, "/a.txt", None, None);
        assert_ne!(base, build_validator(mtime(2000), 42, "/a.txt", None, None));
        assert_ne!(base, build_validator(mtime(1000), 43, "/a.txt", None, None));
    }

    #[test]
    fn test_validator_tracks_transform_target() {
        let plain = build_validator(mtime(1000), 42, "/a.ts", None, None).unwrap();
        let es2015 = build_validator(mtime(1000), 42, "/a.ts", Some("es2015"), None).unwrap();
        let chrome = build_validator(mtime(1000), 42, "/a.ts", Some("chrome109.0"), None).unwrap();
        assert_ne!(plain, es2015);
        assert_ne!(es2015, chrome);
        assert!(es2015.ends_with("-es2015"));
    }

    #[test]
    fn test_deploy_id_fallback() {
        let etag = build_validator(None, 42, "/a.txt", None, Some("deploy-7")).unwrap();
        assert!(etag.starts_with("W/"));
        assert!(etag.ends_with("-deploy-7"));

        // Same path, same deployment: stable
        let again = build_validator(None, 42, "/a.txt", None, Some("deploy-7")).unwrap();
        assert_eq!(etag, again);

        // Different path: different digest
        let other = build_validator(None, 42, "/b.txt", None, Some("deploy-7")).unwrap();
        assert_ne!(etag, other);
    }

    #[test]
    fn test_no_mtime_no_deploy_id_disables_validation() {
        assert_eq!(build_validator(None, 42, "/a.txt", None, None), None);
        assert_eq!(
            build_validator(None, 42, "/a.txt", Some("es2015"), None),
            None
        );
    }

    #[test]
    fn test_matches_is_exact() {
        let etag = "W/1234-ff-es2015";
        assert!(matches(Some("W/1234-ff-es2015"), etag));
        assert!(!matches(Some("W/1234-ff"), etag));
        assert!(!matches(Some("\"W/1234-ff-es2015\""), etag));
        assert!(!matches(Some("*"), etag));
        assert!(!matches(None, etag));
    }
}
