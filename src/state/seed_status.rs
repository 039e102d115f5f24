/// Seed outcome definitions
///
/// Every seed ends in exactly one of these states and is reported to the sink
/// regardless of which one.
use crate::state::AggregatedResult;
use std::fmt;

/// How the crawl of one seed ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedStatus {
    /// Frontier drained or fetch budget spent
    Completed,

    /// Run was cancelled while this seed was in flight
    Interrupted,

    /// Seed could not be crawled (bad URL, lost fetcher session)
    Failed,
}

impl SeedStatus {
    /// Returns true if the traversal ran to its natural end
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for SeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Everything the sink needs to know about one crawled seed
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// Row of the seed in the input list
    pub row: usize,

    /// The seed as written in the input
    pub seed: String,

    pub status: SeedStatus,

    pub result: AggregatedResult,

    /// URLs taken from the frontier (fetch attempts)
    pub pages_visited: usize,

    /// Attempts that returned markup
    pub pages_fetched: usize,

    /// Why the seed failed or was cut short
    pub error: Option<String>,
}

impl SeedReport {
    /// A report for a seed that never got crawled
    pub fn failed(row: usize, seed: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            row,
            seed: seed.into(),
            status: SeedStatus::Failed,
            result: AggregatedResult::new(),
            pages_visited: 0,
            pages_fetched: 0,
            error: Some(error.into()),
        }
    }
}
