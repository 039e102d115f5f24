//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Site-Sift database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- One record per seed row and run
CREATE TABLE IF NOT EXISTS seed_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    row_index INTEGER NOT NULL,
    seed TEXT NOT NULL,
    status TEXT NOT NULL,
    emails TEXT NOT NULL DEFAULT '',
    phones TEXT NOT NULL DEFAULT '',
    facebook TEXT NOT NULL DEFAULT '',
    instagram TEXT NOT NULL DEFAULT '',
    twitter TEXT NOT NULL DEFAULT '',
    linkedin TEXT NOT NULL DEFAULT '',
    pages_visited INTEGER NOT NULL DEFAULT 0,
    pages_fetched INTEGER NOT NULL DEFAULT 0,
    error_message TEXT,
    crawled_at TEXT NOT NULL,
    UNIQUE(run_id, row_index)
);

CREATE INDEX IF NOT EXISTS idx_seed_results_run ON seed_results(run_id);
CREATE INDEX IF NOT EXISTS idx_seed_results_status ON seed_results(status);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
