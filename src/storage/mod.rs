//! Storage module for the run history
//!
//! The history store is a line-oriented, append-only file. Each completed run
//! adds one `<RFC 3339 timestamp>,<url count>` line; existing lines are never
//! rewritten. Appends hold an exclusive advisory lock so concurrent runs
//! cannot interleave partial records.

mod history;

pub use history::{append_record, load_history};

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while reading the history store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Represents one completed crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRecord {
    pub timestamp: DateTime<Utc>,
    pub url_count: usize,
}

impl RunRecord {
    /// Formats the record as a history line, without the newline
    pub fn to_line(&self) -> String {
        format!(
            "{},{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.url_count
        )
    }
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl FromStr for RunRecord {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (timestamp, count) = line
            .trim()
            .rsplit_once(',')
            .ok_or_else(|| "missing ',' separator".to_string())?;

        let timestamp = DateTime::parse_from_rfc3339(timestamp.trim())
            .map_err(|e| format!("invalid timestamp: {}", e))?
            .with_timezone(&Utc);

        let url_count = count
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid count: {}", e))?;

        Ok(Self {
            timestamp,
            url_count,
        })
    }
}
