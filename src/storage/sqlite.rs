//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::SeedStatus;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, SeedRecord};
use crate::SiftError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SiftError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SiftError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SiftError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<SeedRecord> {
    Ok(SeedRecord {
        row_index: row.get::<_, i64>(0)? as usize,
        seed: row.get(1)?,
        status: SeedStatus::from_db_string(&row.get::<_, String>(2)?)
            .unwrap_or(SeedStatus::Failed),
        emails: row.get(3)?,
        phones: row.get(4)?,
        facebook: row.get(5)?,
        instagram: row.get(6)?,
        twitter: row.get(7)?,
        linkedin: row.get(8)?,
        pages_visited: row.get::<_, i64>(9)? as usize,
        pages_fetched: row.get::<_, i64>(10)? as usize,
        error_message: row.get(11)?,
        crawled_at: row.get(12)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Seed Results =====

    fn save_result(&mut self, run_id: i64, record: &SeedRecord) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO seed_results (
                run_id, row_index, seed, status, emails, phones,
                facebook, instagram, twitter, linkedin,
                pages_visited, pages_fetched, error_message, crawled_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(run_id, row_index) DO UPDATE SET
                seed = excluded.seed,
                status = excluded.status,
                emails = excluded.emails,
                phones = excluded.phones,
                facebook = excluded.facebook,
                instagram = excluded.instagram,
                twitter = excluded.twitter,
                linkedin = excluded.linkedin,
                pages_visited = excluded.pages_visited,
                pages_fetched = excluded.pages_fetched,
                error_message = excluded.error_message,
                crawled_at = excluded.crawled_at",
            params![
                run_id,
                record.row_index as i64,
                record.seed,
                record.status.to_db_string(),
                record.emails,
                record.phones,
                record.facebook,
                record.instagram,
                record.twitter,
                record.linkedin,
                record.pages_visited as i64,
                record.pages_fetched as i64,
                record.error_message,
                record.crawled_at,
            ],
        )?;
        Ok(())
    }

    fn load_results(&self, run_id: i64) -> StorageResult<Vec<SeedRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT row_index, seed, status, emails, phones,
                    facebook, instagram, twitter, linkedin,
                    pages_visited, pages_fetched, error_message, crawled_at
             FROM seed_results
             WHERE run_id = ?1
             ORDER BY row_index",
        )?;

        let records = stmt
            .query_map(params![run_id], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count_by_status(&self, run_id: i64) -> StorageResult<HashMap<SeedStatus, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM seed_results WHERE run_id = ?1 GROUP BY status",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (status, count) = row?;
            let status = SeedStatus::from_db_string(&status)
                .ok_or_else(|| StorageError::InvalidValue(format!("seed status '{}'", status)))?;
            counts.insert(status, count as u64);
        }

        Ok(counts)
    }
}
