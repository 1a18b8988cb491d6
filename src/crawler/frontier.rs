//! Frontier queue and visited set for one crawl run
//!
//! The frontier is strictly FIFO so pages are dispatched in breadth-first
//! order from the seed. A URL is marked visited at the moment it is handed out
//! for fetching, and the same canonical URL is never handed out twice.

use crate::url::extract_host;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use url::Url;

/// A URL admitted to the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Parsed form of the canonical URL
    pub url: Url,

    /// Lowercase host, never empty
    pub host: String,
}

impl CrawlTarget {
    /// Builds a target from a canonical URL string
    ///
    /// Returns `None` if the string does not parse or has no host.
    pub fn parse(canonical: &str) -> Option<Self> {
        let url = Url::parse(canonical).ok()?;
        let host = extract_host(&url)?;
        Some(Self { url, host })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FIFO frontier with its visited set
#[derive(Debug, Default)]
pub struct Frontier {
    /// Pending targets, oldest first
    queue: VecDeque<CrawlTarget>,

    /// Canonical URLs already handed out for fetching
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn new(seed: CrawlTarget) -> Self {
        let mut frontier = Self::default();
        frontier.queue.push_back(seed);
        frontier
    }

    /// Appends a canonical URL to the tail unless it was already visited
    ///
    /// Returns true if the URL was enqueued.
    pub fn push(&mut self, canonical: &str) -> bool {
        if self.visited.contains(canonical) {
            return false;
        }

        match CrawlTarget::parse(canonical) {
            Some(target) => {
                self.queue.push_back(target);
                true
            }
            None => {
                tracing::debug!("Refusing frontier entry without host: {}", canonical);
                false
            }
        }
    }

    /// Pops the next unvisited target and marks it visited
    ///
    /// Entries that were enqueued more than once are discarded when they
    /// reach the front a second time.
    pub fn pop_next(&mut self) -> Option<CrawlTarget> {
        while let Some(target) = self.queue.pop_front() {
            if self.visited.insert(target.as_str().to_string()) {
                return Some(target);
            }
        }
        None
    }

    /// Number of pending entries, duplicates included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs handed out so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
