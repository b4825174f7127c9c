//! Configuration management
//!
//! This module handles loading the optional bucketops configuration file.
//! The file is stored in TOML format at ~/.config/bucketops/config.toml, or
//! under `$BUCKETOPS_CONFIG_DIR` when that variable is set.
//!
//! The file never holds credentials. Those are resolved by the SDK's default
//! provider chain.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "BUCKETOPS_CONFIG_DIR";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Storage connection settings
    #[serde(default)]
    pub s3: S3Settings,
}

/// Color mode for terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Default settings for CLI behavior
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    /// Color mode: "auto", "always", or "never"
    #[serde(default)]
    pub color: ColorMode,

    /// Show progress spinners
    #[serde(default = "default_true")]
    pub progress: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            progress: true,
        }
    }
}

/// Connection settings handed to the storage adapter
///
/// Unset fields fall through to the SDK's own discovery (environment,
/// shared config files, instance metadata).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct S3Settings {
    /// Region override
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    #[serde(default)]
    pub force_path_style: bool,
}

impl S3Settings {
    /// Overlay values given on the command line or environment
    pub fn with_overrides(
        mut self,
        region: Option<String>,
        endpoint_url: Option<String>,
        force_path_style: bool,
    ) -> Self {
        if region.is_some() {
            self.region = region;
        }
        if endpoint_url.is_some() {
            self.endpoint_url = endpoint_url;
        }
        self.force_path_style |= force_path_style;
        self
    }

    /// Check the endpoint URL, if one is configured
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint_url {
            let url = url::Url::parse(endpoint)?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(Error::Config(format!(
                    "Endpoint URL must use http or https: {endpoint}"
                )));
            }
        }
        if matches!(&self.region, Some(r) if r.trim().is_empty()) {
            return Err(Error::Config("Region cannot be empty".into()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            s3: S3Settings::default(),
        }
    }
}

/// Configuration manager handles loading config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("bucketops"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade bucketops.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        config.s3.validate()?;
        Ok(config)
    }
}
