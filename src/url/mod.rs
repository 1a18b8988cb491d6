//! URL handling module for Ripple-Sitemap
//!
//! This module provides link normalization against the seed URL and host
//! extraction for the single-host crawl boundary.

mod domain;
mod normalize;

use serde::Deserialize;

// Re-export main functions
pub use domain::{extract_host, same_host};
pub use normalize::{canonicalize_seed, normalize_link, normalize_link_with};

/// How a relative href is combined with the base URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStrategy {
    /// Append the href to the base URL's path, after a single `/`
    ///
    /// `/about` against `https://x.com/blog/` yields `https://x.com/blog/about`.
    #[default]
    Concatenate,

    /// Full RFC 3986 reference resolution
    ///
    /// `/about` against `https://x.com/blog/` yields `https://x.com/about`.
    /// Changes which pages count as duplicates compared to `Concatenate`.
    Rfc3986,
}
