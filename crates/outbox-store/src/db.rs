use rusqlite::Connection;

use crate::error::Result;

/// Initialise the outbox schema in `conn`.
///
/// Creates the `jobs` and `published` tables (idempotent) and an index on
/// `due_at` so the polling query stays efficient with thousands of
/// scheduled posts.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS jobs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            owner       INTEGER NOT NULL,
            platform    TEXT    NOT NULL,
            body        TEXT    NOT NULL,
            media_path  TEXT,
            media_kind  TEXT,
            due_at      TEXT    NOT NULL,   -- ISO-8601 UTC
            created_at  TEXT    NOT NULL
        );

        -- Efficient polling: SELECT … WHERE due_at <= ?  ORDER BY due_at
        CREATE INDEX IF NOT EXISTS idx_jobs_due_at ON jobs (due_at);

        CREATE TABLE IF NOT EXISTS published (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            owner       INTEGER NOT NULL,
            platform    TEXT    NOT NULL,
            body        TEXT    NOT NULL,
            media_path  TEXT,
            external_id TEXT    NOT NULL,
            status      TEXT    NOT NULL,
            created_at  TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_published_owner
            ON published (owner, created_at DESC);
        ",
    )?;
    Ok(())
}
