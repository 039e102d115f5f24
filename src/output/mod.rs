//! Output module: result sinks and run summaries
//!
//! This module handles:
//! - Shaping seed reports into persisted records ([`ResultSink`])
//! - Generating markdown summaries of a run
//! - Printing statistics for `--stats`

mod markdown;
mod memory;
mod record;
mod sqlite_output;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use memory::MemorySink;
pub use record::shape_record;
pub use sqlite_output::SqliteSink;
pub use stats::print_statistics;
pub use traits::{CrawlSummary, OutputError, OutputResult, ResultSink};

use crate::state::SeedStatus;
use crate::storage::{RunRecord, Storage};
use crate::SiftError;

/// Generates a summary of the most recent run
///
/// # Arguments
///
/// * `storage` - The storage backend containing crawl data
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Successfully generated summary
/// * `Err(SiftError)` - No run recorded yet, or the query failed
pub fn generate_summary(storage: &dyn Storage) -> Result<CrawlSummary, SiftError> {
    let run = storage
        .get_latest_run()?
        .ok_or_else(|| SiftError::Storage("No crawl runs found in database".to_string()))?;

    summarize_run(storage, run)
}

/// Generates a summary of one run
pub fn summarize_run(storage: &dyn Storage, run: RunRecord) -> Result<CrawlSummary, SiftError> {
    let duration_seconds = if let (Ok(started), Some(finished_str)) = (
        run.started_at.parse::<chrono::DateTime<chrono::Utc>>(),
        &run.finished_at,
    ) {
        finished_str
            .parse::<chrono::DateTime<chrono::Utc>>()
            .ok()
            .map(|finished| (finished - started).num_seconds().max(0) as u64)
    } else {
        None
    };

    let counts = storage.count_by_status(run.id)?;
    let count = |status: SeedStatus| counts.get(&status).copied().unwrap_or(0);

    let records = storage.load_results(run.id)?;

    Ok(CrawlSummary {
        run_id: run.id,
        started_at: run.started_at,
        finished_at: run.finished_at,
        duration_seconds,
        status: run.status.to_db_string().to_string(),
        config_hash: run.config_hash,
        seeds_total: records.len() as u64,
        seeds_completed: count(SeedStatus::Completed),
        seeds_interrupted: count(SeedStatus::Interrupted),
        seeds_failed: count(SeedStatus::Failed),
        pages_visited: records.iter().map(|r| r.pages_visited as u64).sum(),
        pages_fetched: records.iter().map(|r| r.pages_fetched as u64).sum(),
        seeds_with_email: records.iter().filter(|r| !r.emails.is_empty()).count() as u64,
        seeds_with_phone: records.iter().filter(|r| !r.phones.is_empty()).count() as u64,
        seeds_with_social: records.iter().filter(|r| traits::has_social(r)).count() as u64,
        records,
    })
}
