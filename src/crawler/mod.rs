//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a per-request timeout
//! - HTML parsing and link extraction
//! - The FIFO frontier and visited set
//! - Overall crawl coordination

mod engine;
mod fetcher;
mod frontier;
mod parser;

pub use engine::{CrawlEngine, CrawlOutcome};
pub use fetcher::{build_http_client, fetch_page};
pub use frontier::{CrawlTarget, Frontier};
pub use parser::extract_links;

use crate::config::Config;
use crate::output::write_sitemap;
use crate::storage::append_record;
use crate::RippleError;
use chrono::{DateTime, Utc};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Sorted URLs written to the sitemap
    pub urls: Vec<String>,

    /// Number of URLs written, as recorded in the history store
    pub count: usize,

    /// Pages that could not be fetched; logged, not part of the history
    pub failed_pages: usize,

    /// Timestamp of the history record
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Human-readable success message
    pub fn message(&self) -> String {
        format!("Sitemap generated with {} URLs", self.count)
    }
}

/// Runs one complete crawl and writes its artifacts
///
/// This is the "run crawl now" entry point. It will:
/// 1. Build the HTTP client and crawl engine from the configuration
/// 2. Crawl the seed host to completion
/// 3. Write the sitemap (lastmod = today's date)
/// 4. Append a record to the history store
///
/// When no page could be fetched, neither artifact is touched.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(RunReport)` - Crawl completed and both artifacts were written
/// * `Err(RippleError)` - Crawl failed; its `Display` is the user-facing message
///
/// # Example
///
/// ```no_run
/// use ripple_sitemap::config::load_config;
/// use ripple_sitemap::crawler::run_once;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_once(&config).await?;
/// println!("{}", report.message());
/// # Ok(())
/// # }
/// ```
pub async fn run_once(config: &Config) -> Result<RunReport, RippleError> {
    let mut engine = CrawlEngine::new(config)?;
    let outcome = engine.run().await?;

    let finished_at = Utc::now();
    let count = outcome.urls.len();

    write_sitemap(
        &outcome.urls,
        finished_at.date_naive(),
        &config.output.sitemap_path,
    )?;
    tracing::info!(
        "Sitemap written to {}",
        config.output.sitemap_path.display()
    );

    append_record(finished_at, count, &config.output.history_path)?;
    tracing::debug!(
        "Run recorded in {}",
        config.output.history_path.display()
    );

    if outcome.failed_pages > 0 {
        tracing::warn!("{} pages could not be fetched", outcome.failed_pages);
    }

    Ok(RunReport {
        urls: outcome.urls,
        count,
        failed_pages: outcome.failed_pages,
        finished_at,
    })
}
