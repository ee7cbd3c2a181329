//! Schema setup for the SQLite backend.
//!
//! `MIGRATIONS[i]` takes the schema from version `i` to `i + 1`. Applied
//! versions are recorded in `schema_migrations`.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

const MIGRATIONS: &[&str] = &[
    // v1: the ordered key space. BLOB keys compare with memcmp, the same
    // order as byte-wise slice comparison.
    "CREATE TABLE kv (
        key BLOB PRIMARY KEY,
        value BLOB NOT NULL
    ) WITHOUT ROWID;",
];

/// Schema version this build writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
    )?;

    let applied: u32 = tx.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    if applied > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {applied} is newer than supported version {CURRENT_VERSION}"
        )));
    }

    for (version, sql) in (1..).zip(MIGRATIONS).skip(applied as usize) {
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at)
             VALUES (?1, CAST(strftime('%s', 'now') AS INTEGER) * 1000)",
            params![version],
        )?;
        tracing::debug!(version, "applied schema migration");
    }

    tx.commit()?;
    Ok(())
}
