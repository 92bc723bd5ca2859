//! Transform policy module
//!
//! Decides the parameters a transform-eligible asset is compiled with.
//! The caller's explicit options always win; request-derived defaults only
//! fill the fields the caller left unset.

pub mod browser;
pub mod engine;

use serde::Deserialize;

/// Conservative baseline used when the `User-Agent` is absent or unrecognized.
pub const FALLBACK_TARGET: &str = "es2015";

/// Output module format requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Esm,
    Cjs,
    Iife,
}

/// Engine input language, derived from the asset's extension.
///
/// Extension normalization: `mts` → `ts`, `mjs` → `js`. Paths outside the
/// module-file pattern have no loader and are never transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Js,
    Jsx,
    Ts,
    Tsx,
    Css,
}

impl Loader {
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, extension) = path.rsplit_once('.')?;
        let loader = match extension {
            "js" | "mjs" => Self::Js,
            "jsx" => Self::Jsx,
            "ts" | "mts" => Self::Ts,
            "tsx" => Self::Tsx,
            "css" => Self::Css,
            _ => return None,
        };
        Some(loader)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Jsx => "jsx",
            Self::Ts => "ts",
            Self::Tsx => "tsx",
            Self::Css => "css",
        }
    }
}

/// Caller-supplied transform option overrides.
///
/// Every field is optional: unset fields are filled from request-derived
/// defaults in [`resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformConfig {
    pub target: Option<String>,
    pub format: Option<OutputFormat>,
    pub sourcemap: Option<bool>,
    pub minify: Option<bool>,
}

/// Fully resolved option set handed to the engine, computed once per request.
#[derive(Debug, Clone)]
pub struct ResolvedTransform {
    pub target: String,
    pub format: OutputFormat,
    pub sourcemap: bool,
    pub minify: bool,
    pub loader: Loader,
    pub sourcefile: String,
}

/// Merge caller overrides over request-derived defaults.
///
/// * `target`: caller value, else `<browser><major.minor>` from the
///   `User-Agent`, else [`FALLBACK_TARGET`].
/// * `format`: caller value, else ECMAScript modules.
/// * `sourcemap`: caller value, else inline only for local origins.
/// * `minify`: caller value, else enabled only for non-local origins.
pub fn resolve(
    config: &TransformConfig,
    loader: Loader,
    pathname: &str,
    user_agent: Option<&str>,
    local_origin: bool,
) -> ResolvedTransform {
    let target = config.target.clone().unwrap_or_else(|| {
        browser::classify(user_agent).map_or_else(
            || FALLBACK_TARGET.to_string(),
            |browser| format!("{}{}", browser.name, browser.version),
        )
    });

    ResolvedTransform {
        target,
        format: config.format.unwrap_or(OutputFormat::Esm),
        sourcemap: config.sourcemap.unwrap_or(local_origin),
        minify: config.minify.unwrap_or(!local_origin),
        loader,
        sourcefile: pathname.to_string(),
    }
}
