//! Configuration management for ForgeScore
//!
//! Configuration comes from an optional TOML file, then `FORGESCORE_*`
//! environment variables, then command-line flags. Every field has a
//! default so an empty file is a valid configuration.

use crate::logging::LogFormat;
use forgescore_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Vector parsing and scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Result output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Load a TOML file if it exists, defaults otherwise
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Check values that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        self.logging.format.parse::<LogFormat>()?;
        match self.output.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(Error::Configuration(format!(
                "Unknown output format {:?} (expected text or json)",
                other
            ))),
        }
    }

    /// Merge with environment variables (FORGESCORE_ prefix)
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides looked up by environment variable name
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Scoring
        if let Some(val) = lookup("FORGESCORE_STRICT_PARSING") {
            if let Some(strict) = parse_bool(&val) {
                self.scoring.strict_parsing = strict;
            }
        }

        // Logging
        if let Some(val) = lookup("FORGESCORE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("FORGESCORE_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Some(val) = lookup("FORGESCORE_LOG_FILE") {
            self.logging.file = Some(val);
        }

        // Output
        if let Some(val) = lookup("FORGESCORE_OUTPUT_FORMAT") {
            self.output.format = val;
        }
        if let Some(val) = lookup("FORGESCORE_PRETTY_JSON") {
            if let Some(pretty) = parse_bool(&val) {
                self.output.pretty_json = pretty;
            }
        }

        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Vector parsing and scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Reject unknown codes and values instead of dropping them
    #[serde(default)]
    pub strict_parsing: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log file path (optional, stderr otherwise)
    pub file: Option<String>,
}

fn default_log_level() -> String {
    String::from("warn")
}

fn default_log_format() -> String {
    String::from("compact")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

/// Result output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (text, json)
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Indent JSON output
    #[serde(default)]
    pub pretty_json: bool,
}

fn default_output_format() -> String {
    String::from("text")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            pretty_json: false,
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn strict_parsing(mut self, strict: bool) -> Self {
        self.config.scoring.strict_parsing = strict;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn log_format(mut self, format: impl Into<String>) -> Self {
        self.config.logging.format = format.into();
        self
    }

    pub fn log_file(mut self, path: impl Into<String>) -> Self {
        self.config.logging.file = Some(path.into());
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.config.output.format = format.into();
        self
    }

    pub fn pretty_json(mut self, pretty: bool) -> Self {
        self.config.output.pretty_json = pretty;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
