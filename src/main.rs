//! Trawl main entry point
//!
//! Command-line interface for the Trawl crawler and document converter.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use trawl::config::{load_config, Config};
use trawl::report::{print_conversion_report, print_crawl_report};
use trawl::{Engine, EngineReport};
use tracing_subscriber::EnvFilter;

/// Trawl: crawl the web and convert pages into token documents
///
/// Trawl runs a breadth-first crawler over a seed list, writes a metadata
/// catalog plus raw page files, and turns those pages into stopword-filtered
/// token streams for an indexer.
#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(version)]
#[command(about = "Search engine ingestion: crawl and convert", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would run without running it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully");

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = Engine::new(config)?.run().await.context("Run failed")?;

    if !cli.quiet {
        print_engine_report(&report);
    }

    Ok(())
}

/// Prints every report a run produced
///
/// A linked converter's report is printed as part of the crawl report; a
/// standalone batch converter's report is printed on its own.
fn print_engine_report(report: &EngineReport) {
    let linked = report
        .crawl
        .as_ref()
        .is_some_and(|crawl| crawl.conversion.is_some());

    if let Some(crawl) = &report.crawl {
        print_crawl_report(crawl);
    }
    if !linked {
        if let Some(conversion) = &report.conversion {
            if report.crawl.is_some() {
                println!();
            }
            print_conversion_report(conversion);
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trawl=info,warn"),
            1 => EnvFilter::new("trawl=debug,info"),
            2 => EnvFilter::new("trawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would run
fn handle_dry_run(config: &Config) {
    println!("=== Trawl Dry Run ===\n");

    match config.enabled_downloader() {
        Some(downloader) => {
            println!("Downloader:");
            println!("  Seed list: {}", downloader.seed_path.display());
            println!("  Raw storage: {}", downloader.source_dir.display());
            println!("  Catalog: {}", downloader.catalog_path.display());
            println!("  Max depth: {}", downloader.max_depth);
            println!("  Spider pool: {}", downloader.spider_pool_size);
            println!("  Request timeout: {}s", downloader.request_timeout_secs);
            println!(
                "  User agent: {}/{}",
                downloader.user_agent.crawler_name, downloader.user_agent.crawler_version
            );
            println!("  Linked to converter: {}", downloader.link_converter);
        }
        None => println!("Downloader: disabled"),
    }
    println!();

    match config.enabled_converter() {
        Some(converter) => {
            println!("Converter:");
            println!("  Mode: {:?}", converter.mode);
            println!("  Source: {}", converter.source_dir.display());
            println!("  Done: {}", converter.done_dir.display());
            println!("  Stopwords: {}", converter.stopwords_path.display());
            println!("  Resolver pool: {}", converter.resolver_pool_size);
            println!("  Linked to indexer: {}", converter.link_indexer);
        }
        None => println!("Converter: disabled"),
    }
    println!();

    println!(
        "Indexer: {}",
        if config.enabled_indexer().is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );

    println!("\n✓ Configuration is valid");
}
