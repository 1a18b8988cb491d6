//! Output module for generating crawl artifacts and reports
//!
//! This module handles:
//! - Writing the sitemap protocol document
//! - Summarizing the run history for display

mod sitemap;
pub mod stats;

pub use sitemap::{render_sitemap, write_sitemap, SitemapEntry, SITEMAP_NAMESPACE};
pub use stats::{load_statistics, print_statistics, HistoryStatistics};
