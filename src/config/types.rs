use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Trawl
///
/// Every section is optional; an absent section disables that component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub downloader: Option<DownloaderConfig>,
    pub converter: Option<ConverterConfig>,
    pub indexer: Option<IndexerConfig>,
}

impl Config {
    /// Returns the downloader section if present and enabled
    pub fn enabled_downloader(&self) -> Option<&DownloaderConfig> {
        self.downloader.as_ref().filter(|d| d.enable)
    }

    /// Returns the converter section if present and enabled
    pub fn enabled_converter(&self) -> Option<&ConverterConfig> {
        self.converter.as_ref().filter(|c| c.enable)
    }

    /// Returns the indexer section if present and enabled
    pub fn enabled_indexer(&self) -> Option<&IndexerConfig> {
        self.indexer.as_ref().filter(|i| i.enable)
    }
}

/// Downloader (crawler) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DownloaderConfig {
    #[serde(default = "default_true")]
    pub enable: bool,

    /// Text file with one seed URL per line
    #[serde(rename = "seed-path")]
    pub seed_path: PathBuf,

    /// Directory receiving one raw file per fetched page
    #[serde(rename = "source-dir")]
    pub source_dir: PathBuf,

    /// Append-only catalog of document metadata
    #[serde(rename = "catalog-path")]
    pub catalog_path: PathBuf,

    /// Total number of levels crawled, seeds included
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent fetches
    #[serde(rename = "spider-pool-size")]
    pub spider_pool_size: usize,

    /// Push every fetched page to the converter
    #[serde(rename = "link-converter", default)]
    pub link_converter: bool,

    /// Write the catalog title line as `tile=` for compatibility with old catalogs
    #[serde(rename = "legacy-title-key", default)]
    pub legacy_title_key: bool,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_timeout")]
    pub request_timeout_secs: u64,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// How the converter receives its work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertMode {
    /// Paths are pushed by the downloader as pages are fetched
    #[default]
    Reactive,
    /// The source directory is scanned once at start
    Batch,
}

/// Converter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConverterConfig {
    #[serde(default = "default_true")]
    pub enable: bool,

    #[serde(default)]
    pub mode: ConvertMode,

    /// Directory scanned in batch mode
    #[serde(rename = "source-dir")]
    pub source_dir: PathBuf,

    /// Directory receiving one token file per converted document
    #[serde(rename = "done-dir")]
    pub done_dir: PathBuf,

    /// Text file with one stopword per line
    #[serde(rename = "stopwords-path")]
    pub stopwords_path: PathBuf,

    /// Maximum number of concurrent resolvers
    #[serde(rename = "resolver-pool-size")]
    pub resolver_pool_size: usize,

    /// Forward token documents to the indexer
    #[serde(rename = "link-indexer", default)]
    pub link_indexer: bool,
}

/// Indexer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    #[serde(default = "default_true")]
    pub enable: bool,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}
