//! Storage module for persisting crawl results
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Run tracking (start, finish, final status)
//! - One result record per seed row and run

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::SeedStatus;

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Interrupted,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One persisted seed result, already shaped for display
///
/// Emails and phones are `", "`-joined; an absent social platform is an empty
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRecord {
    pub row_index: usize,
    pub seed: String,
    pub status: SeedStatus,
    pub emails: String,
    pub phones: String,
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub linkedin: String,
    pub pages_visited: usize,
    pub pages_fetched: usize,
    pub error_message: Option<String>,
    pub crawled_at: String,
}
