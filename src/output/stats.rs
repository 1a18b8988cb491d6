//! Run history statistics
//!
//! Summarizes the records of the history store for the `--history` mode.

use crate::storage::{load_history, RunRecord};
use crate::RippleError;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Summary of all recorded runs
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStatistics {
    /// Every run, oldest first
    pub runs: Vec<RunRecord>,

    /// Timestamp of the most recent run
    pub last_run: Option<DateTime<Utc>>,

    /// Largest URL count seen in any run
    pub max_urls: usize,

    /// Mean URL count per run
    pub average_urls: f64,
}

impl HistoryStatistics {
    pub fn from_records(runs: Vec<RunRecord>) -> Self {
        let last_run = runs.last().map(|r| r.timestamp);
        let max_urls = runs.iter().map(|r| r.url_count).max().unwrap_or(0);
        let average_urls = if runs.is_empty() {
            0.0
        } else {
            runs.iter().map(|r| r.url_count).sum::<usize>() as f64 / runs.len() as f64
        };

        Self {
            runs,
            last_run,
            max_urls,
            average_urls,
        }
    }
}

/// Loads the history store and summarizes it
pub fn load_statistics(history_path: &Path) -> Result<HistoryStatistics, RippleError> {
    let runs = load_history(history_path)?;
    Ok(HistoryStatistics::from_records(runs))
}

/// Prints history statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HistoryStatistics) {
    println!("=== Crawl History ===\n");

    if stats.runs.is_empty() {
        println!("No runs recorded yet");
        return;
    }

    println!("Runs ({}):", stats.runs.len());
    for run in &stats.runs {
        println!("  {}  {} URLs", run.timestamp.to_rfc3339(), run.url_count);
    }
    println!();

    if let Some(last) = stats.last_run {
        println!("Last run: {}", last.to_rfc3339());
    }
    println!("Largest sitemap: {} URLs", stats.max_urls);
    println!("Average sitemap: {:.1} URLs", stats.average_urls);
}
