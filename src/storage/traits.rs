//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::SeedStatus;
use crate::storage::{RunRecord, RunStatus, SeedRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the crawler.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Sets the final status of a run and stamps its finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Seed Results =====

    /// Inserts or replaces the result for one seed row of a run
    fn save_result(&mut self, run_id: i64, record: &SeedRecord) -> StorageResult<()>;

    /// Loads every result of a run in row order
    fn load_results(&self, run_id: i64) -> StorageResult<Vec<SeedRecord>>;

    /// Counts the results of a run per seed status
    fn count_by_status(&self, run_id: i64) -> StorageResult<HashMap<SeedStatus, u64>>;
}
