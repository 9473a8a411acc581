//! Engine - component wiring
//!
//! Builds the enabled components from a [`Config`] and links them:
//! downloader -> converter -> indexer. Links are passed in at construction, so
//! a component never exists half-wired.

use crate::config::{validate, Config};
use crate::converter::{Converter, ConverterHandle};
use crate::crawler::Downloader;
use crate::indexer::{Indexer, LoggingIndexer};
use crate::report::{ConversionReport, CrawlReport};
use crate::Result;
use std::sync::Arc;

/// Reports of everything an [`Engine`] ran
#[derive(Debug, Clone, Default)]
pub struct EngineReport {
    pub crawl: Option<CrawlReport>,
    pub conversion: Option<ConversionReport>,
}

/// Top-level driver
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Creates an engine after validating the whole configuration
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// Constructs, links and runs every enabled component
    ///
    /// A downloader and a converter that is not linked to it (batch mode) run
    /// concurrently. Returns once all of them have stopped.
    ///
    /// # Returns
    ///
    /// * `Ok(EngineReport)` - Everything ran to completion
    /// * `Err(TrawlError)` - A component failed to construct or a control task died
    pub async fn run(self) -> Result<EngineReport> {
        let indexer: Option<Arc<dyn Indexer>> = self
            .config
            .enabled_indexer()
            .map(|_| Arc::new(LoggingIndexer::new()) as Arc<dyn Indexer>);

        let converter = match self.config.enabled_converter() {
            Some(config) => {
                let indexer = if config.link_indexer {
                    indexer.clone()
                } else {
                    None
                };
                Some(Converter::new(config.clone(), indexer)?)
            }
            None => None,
        };

        let linked = self
            .config
            .enabled_downloader()
            .is_some_and(|d| d.link_converter);
        let handle = converter.map(Converter::start);
        let (linked_handle, standalone) = if linked {
            (handle, None)
        } else {
            (None, handle)
        };

        let downloader = match self.config.enabled_downloader() {
            Some(config) => match Downloader::new(config.clone(), linked_handle) {
                Ok(downloader) => Some(downloader),
                Err(e) => {
                    stop_standalone(standalone).await;
                    return Err(e);
                }
            },
            None => None,
        };

        tracing::info!(
            "Engine starting: downloader {}, converter {}, indexer {}",
            enabled(downloader.is_some()),
            enabled(linked || standalone.is_some()),
            enabled(indexer.is_some())
        );

        let crawl = async {
            match downloader {
                Some(downloader) => downloader.run().await.map(Some),
                None => Ok(None),
            }
        };
        let batch = async {
            match standalone {
                Some(handle) => handle.prepare_stop().await.map(Some),
                None => Ok(None),
            }
        };
        let (crawl, batch) = tokio::join!(crawl, batch);

        let crawl = crawl?;
        let conversion = match batch? {
            Some(report) => Some(report),
            None => crawl.as_ref().and_then(|c| c.conversion.clone()),
        };

        tracing::info!("Engine finished");
        Ok(EngineReport { crawl, conversion })
    }
}

async fn stop_standalone(handle: Option<ConverterHandle>) {
    if let Some(handle) = handle {
        if let Err(e) = handle.prepare_stop().await {
            tracing::error!("Converter did not stop cleanly: {}", e);
        }
    }
}

fn enabled(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
