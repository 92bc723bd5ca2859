//! Configuration module for the embedding server binary.
//!
//! Loads settings from an optional `config.toml` plus `ASSETS_`-prefixed
//! environment variables, with defaults for everything.

use std::net::SocketAddr;
use std::path::PathBuf;

use regex::Regex;
use serde::Deserialize;

use crate::handler::{AssetOptions, TransformMode};
use crate::transform::TransformConfig;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub keep_alive: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

/// Asset pipeline configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    pub root: String,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub transform: TransformSetting,
    #[serde(default)]
    pub transform_options: TransformConfig,
}

/// `transform` accepts a boolean or a pattern string in the config file.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum TransformSetting {
    Enabled(bool),
    Pattern(String),
}

impl Default for TransformSetting {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

impl Config {
    /// Load configuration from the default `config.toml` location.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("ASSETS"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.keep_alive", true)?
            .set_default("logging.access_log", true)?
            .set_default("assets.root", ".")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Build the per-request asset options from the loaded configuration.
    pub fn asset_options(&self) -> Result<AssetOptions, regex::Error> {
        let transform = match &self.assets.transform {
            TransformSetting::Enabled(false) => TransformMode::Disabled,
            TransformSetting::Enabled(true) => TransformMode::All,
            TransformSetting::Pattern(pattern) => TransformMode::Matching(Regex::new(pattern)?),
        };
        Ok(AssetOptions {
            root: PathBuf::from(&self.assets.root),
            ignore: self.assets.ignore.clone(),
            transform,
            transform_options: self.assets.transform_options.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("/nonexistent/path/config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.assets.root, ".");
        assert!(cfg.assets.ignore.is_empty());

        let options = cfg.asset_options().unwrap();
        assert!(!options.transform.matches("/app.ts"));
    }

    #[test]
    fn test_load_from_toml_with_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
[server]
port = 9000

[assets]
root = "/public"
ignore = ["/private"]
transform = "\\.tsx?$"
"#
        )
        .unwrap();

        let stem = dir.path().join("config");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.assets.root, "/public");
        assert_eq!(cfg.assets.ignore, vec!["/private".to_string()]);

        let options = cfg.asset_options().unwrap();
        assert!(options.transform.matches("/app.ts"));
        assert!(!options.transform.matches("/app.js"));
    }

    #[test]
    fn test_transform_boolean_setting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[assets]\ntransform = true\n").unwrap();

        let stem = dir.path().join("config");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        let options = cfg.asset_options().unwrap();
        assert!(options.transform.matches("/anything.ts"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let cfg = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
                keep_alive: true,
            },
            logging: LoggingConfig {
                access_log: true,
                access_log_file: None,
                error_log_file: None,
            },
            assets: AssetsConfig {
                root: ".".to_string(),
                ignore: Vec::new(),
                transform: TransformSetting::Pattern("(".to_string()),
                transform_options: TransformConfig::default(),
            },
        };
        assert!(cfg.asset_options().is_err());
    }
}
