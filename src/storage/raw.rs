//! Raw page storage

use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Extension given to raw page files
const RAW_EXTENSION: &str = "txt";

/// Derives a document id from the fetch time and URL
///
/// The id is the first 16 bytes of a SHA-256 digest, hex encoded. Collisions
/// are not checked.
///
/// # Examples
///
/// ```
/// use chrono::Local;
/// use trawl::storage::document_id;
///
/// let id = document_id(&Local::now(), "https://example.com/");
/// assert_eq!(id.len(), 32);
/// ```
pub fn document_id(fetched_at: &DateTime<Local>, url: &str) -> String {
    let stamp = fetched_at
        .timestamp_nanos_opt()
        .unwrap_or_else(|| fetched_at.timestamp_micros());
    let mut hasher = Sha256::new();
    hasher.update(format!("{} {}", stamp, url).as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

/// Directory holding one raw file per fetched document
#[derive(Debug, Clone)]
pub struct RawStore {
    dir: PathBuf,
}

impl RawStore {
    /// Opens the store, creating the directory if it does not exist
    pub fn create(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            tracing::info!("Source directory missing, creating {}", dir.display());
        }
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the raw file for a document id
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, RAW_EXTENSION))
    }

    /// Writes an unmodified page body and returns its path
    pub async fn write(&self, id: &str, body: &str) -> std::io::Result<PathBuf> {
        let path = self.path_for(id);
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}
