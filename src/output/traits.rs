//! Result sink trait and summary types
//!
//! This module defines the interface every seed report flows through and the
//! data structure backing run summaries.

use crate::state::SeedReport;
use crate::storage::SeedRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives one report per crawled seed
///
/// Only one sink exists per run; in concurrent mode reports reach it through
/// a channel, in whatever order seeds finish.
pub trait ResultSink {
    /// Shapes and persists the result of one seed
    fn emit(&mut self, report: &SeedReport) -> OutputResult<()>;
}

/// Summary of one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub run_id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub status: String,
    pub config_hash: String,

    // Seed outcomes
    pub seeds_total: u64,
    pub seeds_completed: u64,
    pub seeds_interrupted: u64,
    pub seeds_failed: u64,

    // Pages
    pub pages_visited: u64,
    pub pages_fetched: u64,

    // Seeds that yielded at least one signal of each kind
    pub seeds_with_email: u64,
    pub seeds_with_phone: u64,
    pub seeds_with_social: u64,

    /// Per-seed records in row order
    pub records: Vec<SeedRecord>,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of seeds that yielded any contact signal
    pub fn hit_rate(&self) -> f64 {
        if self.seeds_total == 0 {
            return 0.0;
        }
        let hits = self.records.iter().filter(|r| has_any_signal(r)).count();
        (hits as f64 / self.seeds_total as f64) * 100.0
    }

    /// Percentage of attempted pages that returned markup
    pub fn fetch_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / self.pages_visited as f64) * 100.0
    }
}

pub(crate) fn has_social(record: &SeedRecord) -> bool {
    [
        &record.facebook,
        &record.instagram,
        &record.twitter,
        &record.linkedin,
    ]
    .iter()
    .any(|slot| !slot.is_empty())
}

pub(crate) fn has_any_signal(record: &SeedRecord) -> bool {
    !record.emails.is_empty() || !record.phones.is_empty() || has_social(record)
}
