//! ForgeScore Common - Shared utilities: configuration and logging
//!
//! This crate provides the ambient setup used by ForgeScore front ends.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigBuilder, LoggingConfig, OutputConfig, ScoringConfig};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogFormat};
