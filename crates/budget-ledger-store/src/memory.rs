//! In-memory implementation of the KvStore trait.
//!
//! This is primarily for testing. It has the same transaction semantics as
//! SQLite but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::StoreError;
use crate::traits::{Entry, KvStore, ReadTxn, WriteTxn};

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory store implementation.
///
/// The key space is a copy-on-write `BTreeMap`. Snapshots share the current
/// map by `Arc`; a writer stages its changes in an overlay and publishes a
/// new map on commit. Writers are serialized by a mutex.
pub struct MemoryStore {
    current: RwLock<Arc<Map>>,
    writer: Mutex<()>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Map::new())),
            writer: Mutex::new(()),
        }
    }

    /// Number of keys currently committed.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panicking writer never published its overlay, so a poisoned lock
    // still guards a consistent map.
    fn snapshot(&self) -> Arc<Map> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    fn publish(&self, next: Map) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(next);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let base = self.snapshot();

        let mut txn = MemoryTxn {
            base: &base,
            pending: Map::new(),
        };
        let value = f(&mut txn)?;

        let pending = txn.pending;
        if !pending.is_empty() {
            let mut next = Map::clone(&base);
            next.extend(pending);
            self.publish(next);
        }

        Ok(value)
    }

    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let snapshot = self.snapshot();
        f(&MemorySnapshot { map: &snapshot })
    }
}

struct MemorySnapshot<'a> {
    map: &'a Map,
}

impl ReadTxn for MemorySnapshot<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<Entry>, StoreError> {
        Ok(prefix_range(self.map, prefix)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

struct MemoryTxn<'a> {
    base: &'a Map,
    pending: Map,
}

impl ReadTxn for MemoryTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .pending
            .get(key)
            .or_else(|| self.base.get(key))
            .cloned())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<Entry>, StoreError> {
        let mut merged: BTreeMap<&[u8], &[u8]> = prefix_range(self.base, prefix)
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        for (k, v) in prefix_range(&self.pending, prefix) {
            merged.insert(k.as_slice(), v.as_slice());
        }

        Ok(merged
            .into_iter()
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .collect())
    }
}

impl WriteTxn for MemoryTxn<'_> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

fn prefix_range<'a>(
    map: &'a Map,
    prefix: &'a [u8],
) -> impl Iterator<Item = (&'a Vec<u8>, &'a Vec<u8>)> + 'a {
    map.range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(move |(k, _)| k.starts_with(prefix))
}
