//! SQLite implementation of the KvStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite and keeps the whole key space in a single `kv` table.
//!
//! On-disk stores run in WAL mode with two connections: a writer that opens
//! every transaction with `BEGIN IMMEDIATE`, and a reader whose deferred
//! transactions see a stable snapshot while the writer commits. In-memory
//! stores share one connection for both roles.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{prefix_upper_bound, Entry, KvStore, ReadTxn, WriteTxn};

/// Connection settings for [`SqliteStore`].
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    /// How long a connection waits on a lock held by another process
    /// before failing with `SQLITE_BUSY`.
    pub busy_timeout: Duration,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// SQLite-based store implementation.
///
/// Thread-safe via internal mutexes: writers are serialized on the writer
/// connection, snapshot readers on the reader connection.
///
/// There is one reader connection, so concurrent `view` calls run one at a
/// time. In WAL mode an open write transaction never blocks that reader, and
/// reads here are short point lookups and prefix scans.
pub struct SqliteStore {
    writer: Arc<Mutex<Connection>>,
    reader: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path with default options.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &SqliteOptions::default())
    }

    /// Open a SQLite database at the given path.
    pub fn open_with(path: impl AsRef<Path>, options: &SqliteOptions) -> Result<Self> {
        let path = path.as_ref();

        let mut writer = Connection::open(path)?;
        writer.busy_timeout(options.busy_timeout)?;
        let journal_mode: String =
            writer.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        migration::migrate(&mut writer)?;

        let reader = Connection::open(path)?;
        reader.busy_timeout(options.busy_timeout)?;

        tracing::debug!(path = %path.display(), %journal_mode, "opened sqlite store");

        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            reader: Arc::new(Mutex::new(reader)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing. Snapshots and writers share one connection, so
    /// a `view` closure must not call `update` on the same store.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self {
            writer: Arc::clone(&conn),
            reader: conn,
        })
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock().map_err(StoreError::poisoned)
}

impl KvStore for SqliteStore {
    fn update<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = lock(&self.writer)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;

        // Dropping `txn` on the error path rolls the transaction back.
        let mut txn = SqliteTxn { tx };
        let value = f(&mut txn)?;
        txn.tx.commit().map_err(StoreError::from)?;

        Ok(value)
    }

    fn view<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = lock(&self.reader)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(StoreError::from)?;

        let txn = SqliteTxn { tx };
        let value = f(&txn)?;
        txn.tx.commit().map_err(StoreError::from)?;

        Ok(value)
    }
}

struct SqliteTxn<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    Ok((row.get(0)?, row.get(1)?))
}

impl ReadTxn for SqliteTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut stmt = self.tx.prepare_cached("SELECT value FROM kv WHERE key = ?1")?;
        let value = stmt
            .query_row(params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<Entry>> {
        let entries = match prefix_upper_bound(prefix) {
            Some(upper) => {
                let mut stmt = self.tx.prepare_cached(
                    "SELECT key, value FROM kv WHERE key >= ?1 AND key < ?2 ORDER BY key",
                )?;
                let rows = stmt.query_map(params![prefix, upper], row_to_entry)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self
                    .tx
                    .prepare_cached("SELECT key, value FROM kv WHERE key >= ?1 ORDER BY key")?;
                let rows = stmt.query_map(params![prefix], row_to_entry)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(entries)
    }
}

impl WriteTxn for SqliteTxn<'_> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )?;
        stmt.execute(params![key, value])?;
        Ok(())
    }
}
