//! Catalog writer
//!
//! The catalog is an append-only UTF-8 text file with one block per document:
//!
//! ```text
//! [<id>]
//! hash=<id>
//! time=<YYYY-mm-dd HH:MM:SS>
//! url=<url>
//! title=<title>
//! keywords=<keywords>
//! description=<description>
//! linkcount=<n>
//! link0=<url>
//! ...
//!
//! ```
//!
//! Exactly one task writes the file. Records reach it through an unbounded
//! channel; closing the channel is the stop signal, and every record queued
//! before the close is written before the task exits. After a write error the
//! task keeps draining the channel and counts what it could not write.

use crate::storage::DocumentRecord;
use std::fmt::Write as _;
use std::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Key used for the title line of a catalog block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleKey {
    #[default]
    Title,
    /// `tile=`, as written by older catalogs
    Legacy,
}

impl TitleKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Legacy => "tile",
        }
    }
}

/// Formats one catalog block, trailing blank line included
pub fn format_record(record: &DocumentRecord, title_key: TitleKey) -> String {
    let mut block = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(block, "[{}]", record.id);
    let _ = writeln!(block, "hash={}", record.id);
    let _ = writeln!(block, "time={}", record.fetched_at.format(TIME_FORMAT));
    let _ = writeln!(block, "url={}", single_line(&record.url));
    let _ = writeln!(block, "{}={}", title_key.as_str(), single_line(&record.title));
    let _ = writeln!(block, "keywords={}", single_line(&record.keywords));
    let _ = writeln!(block, "description={}", single_line(&record.description));
    let _ = writeln!(block, "linkcount={}", record.links.len());
    for (index, link) in record.links.iter().enumerate() {
        let _ = writeln!(block, "link{}={}", index, single_line(link));
    }
    block.push('\n');
    block
}

/// Collapses whitespace runs so a value cannot break the line format
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What the writer task managed to do before it exited
#[derive(Debug, Default)]
pub struct CatalogSummary {
    /// Records fully written
    pub written: u64,
    /// Records received but not written because of an IO error
    pub dropped: u64,
    /// First IO error hit, if any
    pub error: Option<std::io::Error>,
}

/// Handle to the single catalog-writing task
#[derive(Debug)]
pub struct CatalogWriter {
    queue: mpsc::UnboundedSender<DocumentRecord>,
    task: JoinHandle<CatalogSummary>,
}

impl CatalogWriter {
    /// Spawns the writer task over an already opened (append mode) file
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(file: File, title_key: TitleKey) -> Self {
        let (queue, mut records) = mpsc::unbounded_channel::<DocumentRecord>();
        let mut out = BufWriter::new(tokio::fs::File::from_std(file));

        let task = tokio::spawn(async move {
            let mut summary = CatalogSummary::default();
            while let Some(record) = records.recv().await {
                if summary.error.is_some() {
                    summary.dropped += 1;
                    continue;
                }
                match write_block(&mut out, &format_record(&record, title_key)).await {
                    Ok(()) => {
                        summary.written += 1;
                        tracing::trace!("Catalogued {}", record.url);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Catalog write failed at {}, dropping further records: {}",
                            record.url,
                            e
                        );
                        summary.dropped += 1;
                        summary.error = Some(e);
                    }
                }
            }

            if summary.error.is_none() {
                if let Err(e) = close(out).await {
                    tracing::error!("Failed to close catalog: {}", e);
                    summary.error = Some(e);
                }
            }
            summary
        });

        Self { queue, task }
    }

    /// Queues a record for writing
    ///
    /// Returns false only if the writer task is gone.
    pub fn enqueue(&self, record: DocumentRecord) -> bool {
        self.queue.send(record).is_ok()
    }

    /// Stops accepting records, drains the queue, and closes the file
    ///
    /// IO failures are reported in the summary; an error is returned only if
    /// the writer task itself died.
    pub async fn finish(self) -> crate::Result<CatalogSummary> {
        let Self { queue, task } = self;
        drop(queue);
        Ok(task.await?)
    }
}

async fn write_block(
    out: &mut BufWriter<tokio::fs::File>,
    block: &str,
) -> std::io::Result<()> {
    out.write_all(block.as_bytes()).await?;
    out.flush().await
}

async fn close(mut out: BufWriter<tokio::fs::File>) -> std::io::Result<()> {
    out.flush().await?;
    out.into_inner().sync_all().await
}
