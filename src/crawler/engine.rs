//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the main crawl loop, including:
//! - Seeding and draining the frontier
//! - Dispatching fetches, at most `max-concurrent-fetches` at a time
//! - Link extraction and normalization of every fetched page
//! - Finalizing the sorted result list

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::parser::extract_links;
use crate::state::CrawlPhase;
use crate::url::{canonicalize_seed, normalize_link_with, JoinStrategy};
use crate::{FetchResult, RippleError};
use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// Result of a completed crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Every successfully fetched page, sorted ascending, no duplicates
    pub urls: Vec<String>,

    /// Pages that were dispatched but could not be fetched
    pub failed_pages: usize,
}

/// Drives one crawl run from `Idle` to `Done`
pub struct CrawlEngine {
    client: Client,
    seed: Url,
    base_host: String,
    fetch_timeout: Duration,
    link_join: JoinStrategy,
    max_in_flight: usize,
    phase: CrawlPhase,
}

impl CrawlEngine {
    /// Creates a new engine from the full configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Engine in the `Idle` phase
    /// * `Err(RippleError)` - The seed URL is unusable or the client failed to build
    pub fn new(config: &Config) -> Result<Self, RippleError> {
        let client = build_http_client(&config.user_agent)?;
        Self::with_client(&config.crawler, client)
    }

    /// Creates a new engine that fetches through the given client
    pub fn with_client(config: &CrawlerConfig, client: Client) -> Result<Self, RippleError> {
        let (seed, base_host) = canonicalize_seed(&config.seed_url)?;

        Ok(Self {
            client,
            seed,
            base_host,
            fetch_timeout: config.fetch_timeout(),
            link_join: config.link_join,
            max_in_flight: config.max_concurrent_fetches.max(1) as usize,
            phase: CrawlPhase::Idle,
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Canonical seed URL the crawl starts from
    pub fn seed(&self) -> &str {
        self.seed.as_str()
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), RippleError> {
        if !self.phase.can_transition_to(next) {
            return Err(RippleError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Runs the crawl to completion
    ///
    /// Loops until the frontier is empty and no fetch is in flight:
    /// 1. Pops unvisited targets (marking them visited) and dispatches fetches
    /// 2. Waits for any fetch to finish
    /// 3. On failure, skips the page without following its links
    /// 4. On success, records the page and enqueues every in-host link that
    ///    has not been visited
    ///
    /// With one fetch in flight the pages are processed in strict
    /// breadth-first order.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - At least one page was fetched
    /// * `Err(RippleError::NoUrlsDiscovered)` - Not even the seed could be fetched
    /// * `Err(RippleError::InvalidTransition)` - The engine already ran
    pub async fn run(&mut self) -> Result<CrawlOutcome, RippleError> {
        self.transition(CrawlPhase::Running)?;
        tracing::info!("Starting crawl from {}", self.seed);

        let seed_target = CrawlTarget::parse(self.seed.as_str())
            .ok_or_else(|| RippleError::MissingHost(self.seed.to_string()))?;

        let mut frontier = Frontier::new(seed_target);
        let mut in_flight: JoinSet<(CrawlTarget, FetchResult<String>)> = JoinSet::new();
        let mut urls: Vec<String> = Vec::new();
        let mut failed_pages = 0;
        let mut pages_processed = 0usize;
        let start_time = std::time::Instant::now();

        loop {
            while in_flight.len() < self.max_in_flight {
                let Some(target) = frontier.pop_next() else {
                    break;
                };
                tracing::debug!("Fetching {} (host {})", target, target.host);

                let client = self.client.clone();
                let timeout = self.fetch_timeout;
                in_flight.spawn(async move {
                    let fetched = fetch_page(&client, target.as_str(), timeout).await;
                    (target, fetched)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };
            let (target, fetched) = joined?;
            pages_processed += 1;

            match fetched {
                Ok(body) => {
                    let enqueued = self.expand(&body, &mut frontier);
                    tracing::debug!("Fetched {}, {} new links queued", target, enqueued);
                    urls.push(target.url.into());
                }
                Err(e) => {
                    failed_pages += 1;
                    tracing::debug!("Skipping unreachable page: {}", e);
                }
            }

            if pages_processed % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = pages_processed as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} pages processed, {} visited, {} in frontier, {:.2} pages/sec",
                    pages_processed,
                    frontier.visited_count(),
                    frontier.len(),
                    rate
                );
            }
        }

        self.transition(CrawlPhase::Done)?;

        if urls.is_empty() {
            return Err(RippleError::NoUrlsDiscovered {
                seed: self.seed.to_string(),
            });
        }

        urls.sort();

        tracing::info!(
            "Crawl completed: {} pages found, {} unreachable, in {:?}",
            urls.len(),
            failed_pages,
            start_time.elapsed()
        );

        Ok(CrawlOutcome { urls, failed_pages })
    }

    /// Enqueues the in-host links of a fetched page, returns how many were new
    fn expand(&self, body: &str, frontier: &mut Frontier) -> usize {
        extract_links(body)
            .iter()
            .filter_map(|href| {
                normalize_link_with(href, &self.seed, &self.base_host, self.link_join)
            })
            .filter(|canonical| frontier.push(canonical))
            .count()
    }
}
