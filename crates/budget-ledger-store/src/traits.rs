//! Store traits: the abstract interface for transactional key-value access.
//!
//! This lets the ledger stay storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use crate::error::StoreError;

/// A key-value pair returned by prefix iteration.
pub type Entry = (Vec<u8>, Vec<u8>);

/// Reads available inside both snapshots and write transactions.
pub trait ReadTxn {
    /// Get the value stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// All entries whose key starts with `prefix`, in ascending byte order
    /// of key.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<Entry>, StoreError>;
}

/// Writes, only reachable through [`KvStore::update`].
///
/// Reads through a `WriteTxn` observe the transaction's own pending writes.
pub trait WriteTxn: ReadTxn {
    /// Insert or overwrite `key`.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}

/// The KvStore trait: atomic transactions over an ordered key space.
///
/// # Design Notes
///
/// - **No bare writes**: the only way to mutate the store is [`update`](KvStore::update).
/// - **Atomicity**: all writes issued inside one `update` become visible
///   together, or not at all if the closure (or the commit) fails.
/// - **Serialized writers**: two `update` calls never interleave, so a value
///   read inside `update` cannot change before the same closure writes.
/// - **Snapshots**: [`view`](KvStore::view) observes one consistent point in
///   time and is unaffected by writers that commit while it runs.
///
/// The closure's error type only has to absorb [`StoreError`], so callers
/// can abort a transaction with their own errors and get them back unchanged.
pub trait KvStore: Send + Sync {
    /// Run `f` inside an atomic read-write transaction.
    ///
    /// If `f` returns `Err`, every write it issued is discarded.
    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>;

    /// Run `f` against a read-only snapshot.
    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StoreError>;
}

/// Smallest key strictly greater than every key starting with `prefix`.
///
/// `None` means the range is unbounded above (the prefix is empty or all
/// `0xff` bytes).
pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut bound = prefix.to_vec();
    while let Some(last) = bound.pop() {
        if last < u8::MAX {
            bound.push(last + 1);
            return Some(bound);
        }
    }
    None
}
