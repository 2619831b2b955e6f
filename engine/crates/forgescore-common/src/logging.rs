//! Logging configuration using tracing

use crate::config::LoggingConfig;
use forgescore_core::{Error, Result};
use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// JSON format (for log aggregation)
    Json,
    /// Compact single-line format (default for the CLI)
    #[default]
    Compact,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(Error::Configuration(format!(
                "Unknown log format {:?} (expected pretty, json or compact)",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level (default: warn)
    pub level: String,
    /// Log format
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr
    pub file: Option<String>,
    /// Include span events (enter/exit)
    pub with_spans: bool,
    /// Include file/line information
    pub with_file: bool,
    /// Include target (module path)
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: String::from("warn"),
            format: LogFormat::Compact,
            file: None,
            with_spans: false,
            with_file: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the log format
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable JSON format
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Write to a file
    pub fn file(mut self, path: impl Into<String>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Enable span events
    pub fn with_spans(mut self) -> Self {
        self.with_spans = true;
        self
    }

    /// Enable file/line information
    pub fn with_file(mut self) -> Self {
        self.with_file = true;
        self
    }
}

impl TryFrom<&LoggingConfig> for LogConfig {
    type Error = Error;

    fn try_from(config: &LoggingConfig) -> Result<Self> {
        Ok(Self {
            level: config.level.clone(),
            format: config.format.parse()?,
            file: config.file.clone(),
            ..Self::default()
        })
    }
}

fn make_writer(file: Option<&str>) -> Result<BoxMakeWriter> {
    match file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(std::io::stderr)),
    }
}

/// Initialize the global tracing subscriber with default settings
pub fn init_logging() -> Result<()> {
    init_logging_with_config(LogConfig::default())
}

/// Initialize the global tracing subscriber with custom configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging_with_config(config: LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let span_events = if config.with_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let writer = make_writer(config.file.as_deref())?;
    let ansi = config.file.is_none();

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(span_events)
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target);

            registry.with(fmt_layer).try_init()
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_span_events(span_events)
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target);

            registry.with(fmt_layer).try_init()
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_span_events(span_events)
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target);

            registry.with(fmt_layer).try_init()
        }
    };

    installed.map_err(|e| Error::Configuration(format!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new()
            .level("debug")
            .json()
            .with_spans()
            .with_file();

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.with_spans);
        assert!(config.with_file);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_from_logging_config() {
        let logging = LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
            file: Some("/tmp/forgescore.log".to_string()),
        };
        let config = LogConfig::try_from(&logging).unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file.as_deref(), Some("/tmp/forgescore.log"));

        let bad = LoggingConfig {
            format: "fancy".to_string(),
            ..LoggingConfig::default()
        };
        assert!(LogConfig::try_from(&bad).is_err());
    }

    #[test]
    fn test_log_file_writer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.log");
        make_writer(path.to_str()).unwrap();
        assert!(path.exists());
    }
}
