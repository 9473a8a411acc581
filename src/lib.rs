//! Trawl: the ingestion front-end of a search engine
//!
//! This crate implements a breadth-first web crawler (the downloader) and a
//! document conversion pipeline (the converter) that turns fetched pages into
//! stopword-filtered token streams ready for indexing.

pub mod config;
pub mod converter;
pub mod crawler;
pub mod engine;
pub mod indexer;
pub mod pool;
pub mod report;
pub mod storage;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Trawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
///
/// These are fatal at construction time: a component that reports one is
/// never started.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Seed list not found: {}", .0.display())]
    MissingSeedList(PathBuf),

    #[error("Seed list is empty: {}", .0.display())]
    EmptySeedList(PathBuf),

    #[error("Stopwords file not found: {}", .0.display())]
    MissingStopwords(PathBuf),

    #[error("Source directory not found: {}", .0.display())]
    MissingSourceDir(PathBuf),
}

/// Result type alias for Trawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use converter::{Converter, ConverterHandle};
pub use crawler::Downloader;
pub use engine::{Engine, EngineReport};
pub use indexer::{Indexer, TokenDocument};
pub use report::{ConversionReport, CrawlReport};
