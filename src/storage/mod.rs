//! Storage module for persisting crawl output
//!
//! This module handles everything the downloader writes to disk:
//! - Raw page bodies, one file per fetch, named by document id
//! - The append-only catalog of document metadata, written by a single task

mod catalog;
mod raw;

pub use catalog::{format_record, CatalogSummary, CatalogWriter, TitleKey};
pub use raw::{document_id, RawStore};

use chrono::{DateTime, Local};

/// Sentinel stored for a missing title, keywords, or description
pub const NONE_SENTINEL: &str = "none";

/// Metadata of one fetched document
///
/// Created by a spider on a successful fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    /// Unique per fetch event; also the raw file's base name
    pub id: String,
    pub fetched_at: DateTime<Local>,
    pub url: String,
    pub title: String,
    pub keywords: String,
    pub description: String,
    /// Absolute outbound links in document order
    pub links: Vec<String>,
}
