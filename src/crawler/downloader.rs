//! Downloader - breadth-first crawl orchestration
//!
//! The downloader owns the frontier, the visited set, and the spider pool. Its
//! control loop is the only place those are touched: spiders run as tasks in a
//! [`JoinSet`] and hand their outcome back through the join, so the
//! termination check (frontier empty, no spider in flight) is made by a single
//! owner and cannot race with a completion.
//!
//! The loop blocks on `join_next` whenever the pool is full or the frontier is
//! empty; it never polls.

use crate::config::{validate_downloader_config, DownloaderConfig};
use crate::converter::ConverterHandle;
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::spider::{build_http_client, run_spider, SpiderOutcome};
use crate::pool::WorkerPool;
use crate::report::CrawlReport;
use crate::storage::{CatalogWriter, RawStore, TitleKey};
use crate::{ConfigError, TrawlError};
use reqwest::Client;
use std::fs::{File, OpenOptions};
use std::path::Path;
use tokio::task::JoinSet;

/// Breadth-first crawler over a bounded pool of spiders
pub struct Downloader {
    config: DownloaderConfig,
    seeds: Vec<String>,
    store: RawStore,
    catalog: File,
    client: Client,
    converter: Option<ConverterHandle>,
}

impl Downloader {
    /// Creates a downloader
    ///
    /// Reads the seed list, creates the raw storage directory if needed, and
    /// opens the catalog in append mode (creating it if needed).
    ///
    /// # Arguments
    ///
    /// * `config` - The downloader configuration
    /// * `converter` - Converter to notify for every fetched page, if any
    ///
    /// # Returns
    ///
    /// * `Ok(Downloader)` - Ready to run
    /// * `Err(TrawlError)` - Configuration error (missing or empty seed list,
    ///   invalid settings) or IO failure; nothing is started
    pub fn new(
        config: DownloaderConfig,
        converter: Option<ConverterHandle>,
    ) -> Result<Self, TrawlError> {
        validate_downloader_config(&config)?;

        if let Some(handle) = &converter {
            if !handle.accepts_submissions() {
                return Err(ConfigError::Validation(
                    "the linked converter must run in reactive mode".to_string(),
                )
                .into());
            }
        }

        let seeds = read_seed_list(&config.seed_path)?;
        let store = RawStore::create(&config.source_dir)?;

        if !config.catalog_path.exists() {
            tracing::info!(
                "Catalog file missing, creating {}",
                config.catalog_path.display()
            );
        }
        let catalog = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.catalog_path)?;

        let client = build_http_client(&config.user_agent, config.request_timeout_secs)?;

        tracing::info!(
            "Downloader initialized: {} seeds, max depth {}, {} spiders",
            seeds.len(),
            config.max_depth,
            config.spider_pool_size
        );

        Ok(Self {
            config,
            seeds,
            store,
            catalog,
            client,
            converter,
        })
    }

    /// Seed URLs read from the seed list
    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// Runs the crawl to completion
    ///
    /// Terminates once the frontier is empty and no spider is in flight. On
    /// the way out the catalog writer drains its queue and closes the file,
    /// then the attached converter (if any) is told to prepare to stop and is
    /// awaited, so no conversion is dropped.
    pub async fn run(self) -> Result<CrawlReport, TrawlError> {
        let Self {
            config,
            seeds,
            store,
            catalog,
            client,
            converter,
        } = self;

        let title_key = if config.legacy_title_key {
            TitleKey::Legacy
        } else {
            TitleKey::Title
        };
        let writer = CatalogWriter::spawn(catalog, title_key);
        let pool = WorkerPool::new("spider", config.spider_pool_size);

        let mut report = CrawlReport {
            seeds: seeds.len(),
            ..CrawlReport::default()
        };
        let mut frontier = Frontier::seeded(seeds);
        let mut spiders = JoinSet::new();

        tracing::info!("Starting crawl");
        loop {
            // Fill the pool from the front of the queue
            while !frontier.is_empty() {
                let Some(permit) = pool.try_acquire() else {
                    break;
                };
                let Some(target) = frontier.next_unvisited() else {
                    break;
                };
                debug_assert!(target.depth < config.max_depth);

                tracing::debug!("Dispatching spider for {} (depth {})", target.url, target.depth);
                report.dispatched += 1;

                let client = client.clone();
                let store = store.clone();
                spiders.spawn(async move {
                    let _permit = permit;
                    run_spider(client, store, target.url, target.depth).await
                });
            }

            // An empty join set here means the frontier is empty as well: with
            // every slot free the loop above only stops once the queue is drained.
            let Some(joined) = spiders.join_next().await else {
                break;
            };

            match joined {
                Ok(outcome) => handle_outcome(
                    outcome,
                    config.max_depth,
                    &mut frontier,
                    &writer,
                    converter.as_ref(),
                    &mut report,
                ),
                Err(e) => {
                    tracing::error!("Spider task failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        report.discarded = frontier.discarded();
        report.peak_spiders = pool.peak();
        tracing::info!(
            "Crawl finished: {} fetched, {} failed, {} duplicates discarded",
            report.fetched,
            report.failed,
            report.discarded
        );

        // Catalog failures stay local: the converter is stopped regardless
        match writer.finish().await {
            Ok(summary) => {
                report.records_written = summary.written;
                report.records_dropped += summary.dropped;
                if let Some(e) = summary.error {
                    tracing::error!(
                        "Catalog incomplete: {} records written, {} dropped: {}",
                        summary.written,
                        summary.dropped,
                        e
                    );
                    report.catalog_error = Some(e.to_string());
                }
            }
            Err(e) => {
                tracing::error!("Catalog writer task failed: {}", e);
                report.catalog_error = Some(e.to_string());
            }
        }

        if let Some(converter) = converter {
            tracing::info!("Telling converter to prepare to stop");
            match converter.prepare_stop().await {
                Ok(conversion) => report.conversion = Some(conversion),
                Err(e) => tracing::error!("Converter did not stop cleanly: {}", e),
            }
        }

        Ok(report)
    }
}

/// Applies one spider outcome to the crawl state
fn handle_outcome(
    outcome: SpiderOutcome,
    max_depth: u32,
    frontier: &mut Frontier,
    writer: &CatalogWriter,
    converter: Option<&ConverterHandle>,
    report: &mut CrawlReport,
) {
    match outcome {
        SpiderOutcome::Failed { url, error, .. } => {
            tracing::warn!("Spider failed for {}: {}", url, error);
            report.failed += 1;
        }
        SpiderOutcome::Fetched {
            record,
            raw_path,
            depth,
        } => {
            tracing::info!("Fetched {} -> {}", record.url, raw_path.display());
            report.fetched += 1;

            if depth + 1 < max_depth {
                for link in &record.links {
                    frontier.push(CrawlTarget::new(link.clone(), depth + 1));
                }
            }

            if let Some(converter) = converter {
                if let Err(e) = converter.submit(raw_path) {
                    tracing::error!("Converter rejected {}: {}", record.id, e);
                }
            }

            if !writer.enqueue(record) {
                tracing::error!("Catalog writer has stopped; record dropped");
                report.records_dropped += 1;
            }
        }
    }
}

/// Reads the seed list: one URL per line, blank lines ignored
fn read_seed_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingSeedList(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let seeds: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if seeds.is_empty() {
        return Err(ConfigError::EmptySeedList(path.to_path_buf()));
    }
    Ok(seeds)
}
