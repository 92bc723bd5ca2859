//! MIME type resolution module
//!
//! Maps request paths to a Content-Type via their extension. Unknown
//! extensions resolve to `None`: files the table does not know are never
//! served as assets, even when they exist on disk.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// Process-wide custom extension registrations
static CUSTOM_TYPES: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn custom_types() -> &'static RwLock<HashMap<String, String>> {
    CUSTOM_TYPES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register a custom extension → MIME mapping, process-wide.
///
/// Custom registrations take precedence over the builtin table. Intended to
/// be called before serving begins; there is no removal.
pub fn register_type(extension: &str, content_type: &str) {
    if let Ok(mut map) = custom_types().write() {
        map.insert(
            extension.trim_start_matches('.').to_ascii_lowercase(),
            content_type.to_string(),
        );
    }
}

/// Resolve the Content-Type for a request path from its extension.
///
/// # Examples
/// ```
/// use asset_server::http::mime::lookup;
/// assert_eq!(lookup("/index.html"), Some("text/html; charset=utf-8".to_string()));
/// assert_eq!(lookup("/data.bin"), None);
/// ```
pub fn lookup(path: &str) -> Option<String> {
    let (_, extension) = path.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();

    if let Ok(map) = custom_types().read() {
        if let Some(content_type) = map.get(&extension) {
            return Some(content_type.clone());
        }
    }

    builtin(&extension).map(ToString::to_string)
}

fn builtin(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "application/xml",

        // Scripts and modules
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "jsx" => "text/jsx; charset=utf-8",
        "ts" | "mts" => "application/typescript; charset=utf-8",
        "tsx" => "text/tsx; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(
            lookup("/index.html"),
            Some("text/html; charset=utf-8".to_string())
        );
        assert_eq!(
            lookup("/app.css"),
            Some("text/css; charset=utf-8".to_string())
        );
        assert_eq!(
            lookup("/app.js"),
            Some("application/javascript; charset=utf-8".to_string())
        );
        assert_eq!(lookup("/logo.png"), Some("image/png".to_string()));
    }

    #[test]
    fn test_module_extensions() {
        assert_eq!(
            lookup("/mod.ts"),
            Some("application/typescript; charset=utf-8".to_string())
        );
        assert_eq!(
            lookup("/mod.mts"),
            Some("application/typescript; charset=utf-8".to_string())
        );
        assert_eq!(
            lookup("/view.tsx"),
            Some("text/tsx; charset=utf-8".to_string())
        );
        assert_eq!(
            lookup("/view.jsx"),
            Some("text/jsx; charset=utf-8".to_string())
        );
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(lookup("/data.xyz"), None);
        assert_eq!(lookup("/no-extension"), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(lookup("/INDEX.HTML"), lookup("/index.html"));
    }

    #[test]
    fn test_register_custom_type() {
        register_type(".vue", "text/vue; charset=utf-8");
        assert_eq!(
            lookup("/app.vue"),
            Some("text/vue; charset=utf-8".to_string())
        );
        register_type("glsl", "text/plain");
        assert_eq!(lookup("/shader.glsl"), Some("text/plain".to_string()));
    }
}
