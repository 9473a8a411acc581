//! Configuration module for Trawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use trawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawl.toml")).unwrap();
//! if let Some(downloader) = config.enabled_downloader() {
//!     println!("Crawler will use max depth: {}", downloader.max_depth);
//! }
//! ```

mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConvertMode, ConverterConfig, DownloaderConfig, IndexerConfig, UserAgentConfig,
};
pub use validation::validate;

pub(crate) use validation::{validate_converter_config, validate_downloader_config};

use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}
