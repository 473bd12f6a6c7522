//! Key-value store interface and an in-memory implementation.
//!
//! The store is addressed by small integer keys and holds opaque byte records,
//! like the NVM object stores of small microcontrollers. The persistence code
//! assumes nothing about the physical medium beyond get/put/delete-by-key and
//! an optional compaction step.

use std::collections::BTreeMap;

use crate::error::StoreError;

/// Record key
pub type Key = u16;

pub trait KeyValueStore {
    /// Read a record; `Ok(None)` if the key has never been written or was deleted.
    fn get(&self, key: Key) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a whole record, replacing any previous value.
    fn put(&mut self, key: Key, value: &[u8]) -> Result<(), StoreError>;

    /// Remove a record. Deleting a missing key is not an error.
    fn delete(&mut self, key: Key) -> Result<(), StoreError>;

    /// Whether the backend would like [`KeyValueStore::compact`] to run.
    fn needs_compaction(&self) -> bool {
        false
    }

    /// Reclaim space left behind by overwritten or deleted records.
    fn compact(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory store with fault injection, for tests and headless hosts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<Key, Vec<u8>>,
    /// Number of successful puts still allowed; None means unlimited.
    writes_left: Option<usize>,
    failing_read: Option<Key>,
    /// Writes between compactions before `needs_compaction` reports true.
    compaction_threshold: Option<usize>,
    dirty_writes: usize,
    compactions: usize,
    puts: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` more puts succeed, then reject every put.
    pub fn fail_writes_after(&mut self, n: usize) {
        self.writes_left = Some(n);
    }

    /// Accept writes again.
    pub fn heal_writes(&mut self) {
        self.writes_left = None;
    }

    /// Make every read of `key` fail.
    pub fn fail_reads_of(&mut self, key: Key) {
        self.failing_read = Some(key);
    }

    /// Report `needs_compaction` after this many writes or deletes.
    pub fn with_compaction_threshold(mut self, writes: usize) -> Self {
        self.compaction_threshold = Some(writes);
        self
    }

    pub fn contains(&self, key: Key) -> bool {
        self.records.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Successful puts so far
    pub fn put_count(&self) -> usize {
        self.puts
    }

    pub fn compaction_count(&self) -> usize {
        self.compactions
    }

    /// Overwrite a raw record without any fault injection.
    pub fn insert_raw(&mut self, key: Key, value: Vec<u8>) {
        self.records.insert(key, value);
    }

    pub fn records(&self) -> &BTreeMap<Key, Vec<u8>> {
        &self.records
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: Key) -> Result<Option<Vec<u8>>, StoreError> {
        if self.failing_read == Some(key) {
            return Err(StoreError::ReadFailed { key });
        }
        Ok(self.records.get(&key).cloned())
    }

    fn put(&mut self, key: Key, value: &[u8]) -> Result<(), StoreError> {
        match self.writes_left {
            Some(0) => return Err(StoreError::WriteFailed { key }),
            Some(ref mut n) => *n -= 1,
            None => {}
        }
        self.records.insert(key, value.to_vec());
        self.dirty_writes += 1;
        self.puts += 1;
        Ok(())
    }

    fn delete(&mut self, key: Key) -> Result<(), StoreError> {
        if self.records.remove(&key).is_some() {
            self.dirty_writes += 1;
        }
        Ok(())
    }

    fn needs_compaction(&self) -> bool {
        self.compaction_threshold
            .is_some_and(|threshold| self.dirty_writes >= threshold)
    }

    fn compact(&mut self) -> Result<(), StoreError> {
        self.dirty_writes = 0;
        self.compactions += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(3).unwrap(), None);
        store.put(3, &[1, 2, 3]).unwrap();
        assert_eq!(store.get(3).unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
        store.delete(3).unwrap();
        assert_eq!(store.get(3).unwrap(), None);
        assert!(store.is_empty());
        // Missing key
        store.delete(3).unwrap();
    }

    #[test]
    fn test_write_failure_injection() {
        let mut store = MemoryStore::new();
        store.fail_writes_after(2);
        store.put(1, &[1]).unwrap();
        store.put(2, &[2]).unwrap();
        assert!(matches!(
            store.put(3, &[3]),
            Err(StoreError::WriteFailed { key: 3 })
        ));
        assert!(!store.contains(3));
        store.heal_writes();
        store.put(3, &[3]).unwrap();
        assert_eq!(store.put_count(), 3);
    }

    #[test]
    fn test_read_failure_injection() {
        let mut store = MemoryStore::new();
        store.put(9, &[9]).unwrap();
        store.fail_reads_of(9);
        assert!(matches!(store.get(9), Err(StoreError::ReadFailed { key: 9 })));
        assert_eq!(store.get(8).unwrap(), None);
    }

    #[test]
    fn test_compaction_threshold() {
        let mut store = MemoryStore::new().with_compaction_threshold(2);
        store.put(1, &[1]).unwrap();
        assert!(!store.needs_compaction());
        store.put(1, &[2]).unwrap();
        assert!(store.needs_compaction());
        store.compact().unwrap();
        assert!(!store.needs_compaction());
        assert_eq!(store.compaction_count(), 1);
    }
}
