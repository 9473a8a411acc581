//! Converter - orchestration of the resolver pool
//!
//! The converter runs as one control task that owns its work queue and its
//! resolver [`JoinSet`]. In reactive mode the queue is fed through a
//! [`ConverterHandle`]; dropping the handle's sender (via
//! [`ConverterHandle::prepare_stop`]) is the stop signal. In batch mode the
//! queue is filled once from the source directory and the task stops by
//! itself once everything is converted.
//!
//! Either way the task only exits after every dispatched resolver has been
//! joined, and then cascades the stop to the indexer.

use crate::config::{validate_converter_config, ConvertMode, ConverterConfig};
use crate::converter::resolver::{ResolveError, Resolved, Resolver};
use crate::converter::stopwords::StopwordSet;
use crate::converter::tokenizer::{JiebaTokenizer, Tokenizer};
use crate::indexer::{Indexer, TokenDocument};
use crate::pool::WorkerPool;
use crate::report::ConversionReport;
use crate::{ConfigError, TrawlError};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use walkdir::WalkDir;

type ResolverResult = (PathBuf, Result<Resolved, ResolveError>);

/// Reasons a submission can be refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("converter runs in batch mode and takes no submissions")]
    BatchMode,

    #[error("converter has stopped accepting work")]
    Closed,
}

/// Document converter driving a bounded pool of resolvers
pub struct Converter {
    config: ConverterConfig,
    stopwords: Arc<StopwordSet>,
    tokenizer: Arc<dyn Tokenizer>,
    indexer: Option<Arc<dyn Indexer>>,
}

impl Converter {
    /// Creates a converter
    ///
    /// Loads the stopwords and creates the done directory if needed. In batch
    /// mode the source directory must already exist.
    ///
    /// # Arguments
    ///
    /// * `config` - The converter configuration
    /// * `indexer` - Consumer of token documents and of the stop cascade, if any
    pub fn new(
        config: ConverterConfig,
        indexer: Option<Arc<dyn Indexer>>,
    ) -> Result<Self, TrawlError> {
        validate_converter_config(&config)?;

        if config.mode == ConvertMode::Batch && !config.source_dir.is_dir() {
            return Err(ConfigError::MissingSourceDir(config.source_dir.clone()).into());
        }

        let stopwords = StopwordSet::load(&config.stopwords_path)?;

        if !config.done_dir.exists() {
            tracing::info!(
                "Done directory missing, creating {}",
                config.done_dir.display()
            );
        }
        std::fs::create_dir_all(&config.done_dir)?;

        tracing::info!(
            "Converter initialized: {:?} mode, {} stopwords, {} resolvers",
            config.mode,
            stopwords.len(),
            config.resolver_pool_size
        );

        Ok(Self {
            config,
            stopwords: Arc::new(stopwords),
            tokenizer: JiebaTokenizer::shared(),
            indexer,
        })
    }

    /// Replaces the default dictionary segmenter
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Spawns the control task and returns its handle
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> ConverterHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let submissions = match self.config.mode {
            ConvertMode::Reactive => Some(sender),
            ConvertMode::Batch => None,
        };

        let task = tokio::spawn(self.run(receiver));
        ConverterHandle { submissions, task }
    }

    async fn run(self, mut submissions: mpsc::UnboundedReceiver<PathBuf>) -> ConversionReport {
        let pool = WorkerPool::new("resolver", self.config.resolver_pool_size);
        let mut report = ConversionReport::default();
        let mut queue = VecDeque::new();
        let mut resolvers: JoinSet<ResolverResult> = JoinSet::new();
        let mut accepting = self.config.mode == ConvertMode::Reactive;

        if self.config.mode == ConvertMode::Batch {
            let dir = self.config.source_dir.clone();
            match tokio::task::spawn_blocking(move || scan_sources(&dir)).await {
                Ok(sources) => {
                    tracing::info!("Found {} documents to convert", sources.len());
                    report.submitted += sources.len();
                    queue.extend(sources);
                }
                Err(e) => tracing::error!("Scanning the source directory failed: {}", e),
            }
        }

        loop {
            self.dispatch(&pool, &mut queue, &mut resolvers);

            if !accepting && queue.is_empty() && resolvers.is_empty() {
                break;
            }

            tokio::select! {
                Some(joined) = resolvers.join_next(), if !resolvers.is_empty() => {
                    self.on_resolver_complete(joined, &mut report);
                }
                received = submissions.recv(), if accepting => match received {
                    Some(path) => {
                        report.submitted += 1;
                        queue.push_back(path);
                    }
                    None => {
                        accepting = false;
                        tracing::info!(
                            "Converter preparing to stop: {} queued, {} resolvers running",
                            queue.len(),
                            pool.occupancy()
                        );
                    }
                },
                else => break,
            }
        }

        report.peak_resolvers = pool.peak();
        tracing::info!(
            "Conversion finished: {} converted, {} missing, {} failed",
            report.converted,
            report.missing,
            report.failed
        );

        if let Some(indexer) = &self.indexer {
            indexer.prepare_stop();
        }
        report
    }

    /// Starts resolvers while there is queued work and a free slot
    fn dispatch(
        &self,
        pool: &WorkerPool,
        queue: &mut VecDeque<PathBuf>,
        resolvers: &mut JoinSet<ResolverResult>,
    ) {
        while !queue.is_empty() {
            let Some(permit) = pool.try_acquire() else {
                break;
            };
            let Some(source) = queue.pop_front() else {
                break;
            };

            tracing::debug!("Starting resolver for {}", source.display());
            let resolver = Resolver::new(
                source,
                self.config.done_dir.clone(),
                Arc::clone(&self.stopwords),
                Arc::clone(&self.tokenizer),
            );
            resolvers.spawn_blocking(move || {
                let _permit = permit;
                let result = resolver.resolve();
                (resolver.source().to_path_buf(), result)
            });
        }
    }

    fn on_resolver_complete(
        &self,
        joined: Result<ResolverResult, JoinError>,
        report: &mut ConversionReport,
    ) {
        match joined {
            Ok((_, Ok(resolved))) => {
                tracing::info!("Resolver finished: {}", resolved.output.display());
                report.converted += 1;
                if let Some(indexer) = &self.indexer {
                    indexer.index(TokenDocument {
                        id: resolved.doc_id,
                        path: resolved.output,
                        tokens: resolved.tokens,
                    });
                }
            }
            Ok((source, Err(ResolveError::SourceMissing(_)))) => {
                tracing::error!("Resolver error, source missing: {}", source.display());
                report.missing += 1;
            }
            Ok((source, Err(e))) => {
                tracing::error!("Resolver failed for {}: {}", source.display(), e);
                report.failed += 1;
            }
            Err(e) => {
                tracing::error!("Resolver task failed: {}", e);
                report.failed += 1;
            }
        }
    }
}

/// Every regular file below `dir`, in file-name order
fn scan_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .collect()
}

/// Handle to a running converter
#[derive(Debug)]
pub struct ConverterHandle {
    submissions: Option<mpsc::UnboundedSender<PathBuf>>,
    task: JoinHandle<ConversionReport>,
}

impl ConverterHandle {
    /// Returns true if [`submit`](Self::submit) can currently succeed
    pub fn accepts_submissions(&self) -> bool {
        self.submissions
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Queues a raw document for conversion (reactive mode only)
    pub fn submit(&self, path: PathBuf) -> Result<(), SubmitError> {
        let sender = self.submissions.as_ref().ok_or(SubmitError::BatchMode)?;
        sender.send(path).map_err(|_| SubmitError::Closed)
    }

    /// Stops accepting work and waits for the converter to drain
    ///
    /// Returns once every queued document has been resolved, all resolvers
    /// have finished, and the indexer (if any) has been told to prepare to
    /// stop. In batch mode this simply waits for the run to complete.
    pub async fn prepare_stop(self) -> Result<ConversionReport, TrawlError> {
        let Self { submissions, task } = self;
        drop(submissions);
        Ok(task.await?)
    }
}
