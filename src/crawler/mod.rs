//! Crawler module for web page fetching and processing
//!
//! This module contains the downloader side of the pipeline:
//! - The frontier queue and visited set
//! - Spiders that fetch and persist a single page
//! - HTML metadata and link extraction
//! - The downloader control loop that drives all of the above

mod downloader;
mod frontier;
mod parser;
mod spider;

pub use downloader::Downloader;
pub use frontier::{CrawlTarget, Frontier};
pub use parser::{parse_html, ParsedPage};
pub use spider::{build_http_client, run_spider, FetchError, SpiderOutcome};
