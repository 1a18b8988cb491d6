use crate::url::JoinStrategy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Ripple-Sitemap
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its host bounds the crawl
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout")]
    pub fetch_timeout: u64,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: u32,

    /// How relative hrefs are joined onto the seed URL
    #[serde(rename = "link-join", default)]
    pub link_join: JoinStrategy,
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

fn default_concurrency() -> u32 {
    1
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the sitemap XML file
    #[serde(rename = "sitemap-path")]
    pub sitemap_path: PathBuf,

    /// Path to the append-only run history
    #[serde(rename = "history-path")]
    pub history_path: PathBuf,
}
