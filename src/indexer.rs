//! Indexer extension point
//!
//! The converter hands every token document it produces to an [`Indexer`] and
//! tells it once, after the last document, to prepare to stop. Building and
//! persisting an inverted index is left to implementations of the trait.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A converted document, as handed to an indexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDocument {
    /// Document id shared with the raw file and the catalog record
    pub id: String,
    /// Path of the token file in the done directory
    pub path: PathBuf,
    /// Surviving tokens, in document order
    pub tokens: Vec<String>,
}

/// Consumer of token documents
///
/// Called from the converter's control task; implementations should hand
/// expensive work off rather than block.
pub trait Indexer: Send + Sync {
    fn index(&self, document: TokenDocument);

    /// Called exactly once, after the final [`index`](Self::index) call
    fn prepare_stop(&self);
}

/// Indexer that only logs what it receives
#[derive(Debug, Default)]
pub struct LoggingIndexer {
    documents: AtomicUsize,
    tokens: AtomicUsize,
}

impl LoggingIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> usize {
        self.documents.load(Ordering::Relaxed)
    }

    pub fn tokens(&self) -> usize {
        self.tokens.load(Ordering::Relaxed)
    }
}

impl Indexer for LoggingIndexer {
    fn index(&self, document: TokenDocument) {
        self.documents.fetch_add(1, Ordering::Relaxed);
        self.tokens.fetch_add(document.tokens.len(), Ordering::Relaxed);
        tracing::debug!(
            "Indexer received {} ({} tokens)",
            document.id,
            document.tokens.len()
        );
    }

    fn prepare_stop(&self) {
        tracing::info!(
            "Indexer preparing to stop after {} documents, {} tokens",
            self.documents(),
            self.tokens()
        );
    }
}
