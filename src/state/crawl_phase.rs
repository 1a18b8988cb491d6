/// Crawl phase definitions
///
/// A crawl engine runs exactly once: it starts `Idle`, moves to `Running`
/// when the frontier is seeded and ends in `Done` when the frontier drains.
use std::fmt;

/// Represents the lifecycle phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Engine constructed, nothing fetched yet
    Idle,

    /// Frontier is being drained
    Running,

    /// Frontier is empty and results are final
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// The only legal moves are `Idle -> Running` and `Running -> Done`;
    /// there is no pause, resume, or restart.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
