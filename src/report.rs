//! Run reports
//!
//! Counters collected by the downloader and converter control loops, and
//! their console rendering.

/// Summary of one downloader run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Seed URLs read from the seed list (duplicates included)
    pub seeds: usize,

    /// Spiders started
    pub dispatched: usize,

    /// Pages fetched and persisted
    pub fetched: usize,

    /// Fetches that reported failure
    pub failed: usize,

    /// Frontier entries dropped because their URL was already visited
    pub discarded: usize,

    /// Catalog records written
    pub records_written: u64,

    /// Records that could not be written to the catalog
    pub records_dropped: u64,

    /// First catalog IO error, if the catalog is incomplete
    pub catalog_error: Option<String>,

    /// Highest spider pool occupancy observed
    pub peak_spiders: usize,

    /// Report of the linked converter, once it has drained
    pub conversion: Option<ConversionReport>,
}

impl CrawlReport {
    /// Share of dispatched fetches that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        percentage(self.fetched, self.dispatched)
    }
}

/// Summary of one converter run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Documents submitted or found by the batch scan
    pub submitted: usize,

    /// Token documents written
    pub converted: usize,

    /// Sources that vanished before they were resolved
    pub missing: usize,

    /// Resolutions that failed for any other reason
    pub failed: usize,

    /// Highest resolver pool occupancy observed
    pub peak_resolvers: usize,
}

impl ConversionReport {
    /// Share of submitted documents that were converted, in percent
    pub fn success_rate(&self) -> f64 {
        percentage(self.converted, self.submitted)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Prints a crawl report to stdout
pub fn print_crawl_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Seed URLs: {}", report.seeds);
    println!("  Spiders dispatched: {}", report.dispatched);
    println!("  Pages fetched: {}", report.fetched);
    println!("  Fetches failed: {}", report.failed);
    println!("  Duplicates discarded: {}", report.discarded);
    println!("  Catalog records written: {}", report.records_written);
    if let Some(error) = &report.catalog_error {
        println!(
            "  Catalog records dropped: {} ({})",
            report.records_dropped, error
        );
    }
    println!("  Peak spiders: {}", report.peak_spiders);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} fetches)",
        report.success_rate(),
        report.fetched,
        report.dispatched
    );

    if let Some(conversion) = &report.conversion {
        println!();
        print_conversion_report(conversion);
    }
}

/// Prints a conversion report to stdout
pub fn print_conversion_report(report: &ConversionReport) {
    println!("=== Conversion Report ===\n");

    println!("Overview:");
    println!("  Documents submitted: {}", report.submitted);
    println!("  Documents converted: {}", report.converted);
    println!("  Sources missing: {}", report.missing);
    println!("  Failures: {}", report.failed);
    println!("  Peak resolvers: {}", report.peak_resolvers);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} documents)",
        report.success_rate(),
        report.converted,
        report.submitted
    );
}
