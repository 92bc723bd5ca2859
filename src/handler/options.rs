//! Per-call options for the asset pipeline.

use std::path::PathBuf;

use regex::Regex;

use crate::transform::TransformConfig;

/// Whether (and for which paths) module files are transformed.
#[derive(Debug, Clone, Default)]
pub enum TransformMode {
    /// Never transform.
    #[default]
    Disabled,
    /// Transform every module-pattern file.
    All,
    /// Transform module-pattern files whose request path also matches the
    /// supplied pattern.
    Matching(Regex),
}

impl TransformMode {
    /// True when this mode allows transforming `path` (module-pattern match
    /// is checked separately by the pipeline).
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Disabled => false,
            Self::All => true,
            Self::Matching(pattern) => pattern.is_match(path),
        }
    }
}

/// Options for one invocation of the asset pipeline.
#[derive(Debug, Clone)]
pub struct AssetOptions {
    /// Base directory request paths are resolved against.
    pub root: PathBuf,
    /// Path prefixes excluded from asset handling entirely.
    pub ignore: Vec<String>,
    pub transform: TransformMode,
    /// Caller overrides merged over request-derived transform defaults.
    pub transform_options: TransformConfig,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ignore: Vec::new(),
            transform: TransformMode::Disabled,
            transform_options: TransformConfig::default(),
        }
    }
}
