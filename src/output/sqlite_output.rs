//! SQLite-backed result sink
//!
//! This module provides a sink that writes every seed report straight to the
//! storage backend under the current run.

use crate::output::record::shape_record;
use crate::output::traits::{OutputError, OutputResult, ResultSink};
use crate::state::SeedReport;
use crate::storage::Storage;

/// Persists seed results into the `seed_results` table of one run
pub struct SqliteSink<'a> {
    storage: &'a mut dyn Storage,
    run_id: i64,
}

impl<'a> SqliteSink<'a> {
    /// Creates a new SQLite sink
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend to write to
    /// * `run_id` - The current run ID
    pub fn new(storage: &'a mut dyn Storage, run_id: i64) -> Self {
        Self { storage, run_id }
    }
}

impl ResultSink for SqliteSink<'_> {
    fn emit(&mut self, report: &SeedReport) -> OutputResult<()> {
        let record = shape_record(report);
        self.storage
            .save_result(self.run_id, &record)
            .map_err(|e| OutputError::Storage(e.to_string()))?;

        tracing::debug!(
            "Persisted row {} ({}) for run {}",
            record.row_index,
            record.status,
            self.run_id
        );
        Ok(())
    }
}
