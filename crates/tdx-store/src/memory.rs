//! In-memory store for testing.
//!
//! `MemoryStore` implements `KvStore` over a `BTreeMap`, which already keeps
//! keys in the byte order a prefix scan has to follow.

use crate::{error::StoreError, KvStore};
use std::collections::BTreeMap;
use std::ops::ControlFlow;

/// In-memory key-value store.
///
/// Uses builder pattern for convenient setup in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder pattern). Replaces any existing value.
    pub fn with_entry(mut self, key: Vec<u8>, value: Vec<u8>) -> Self {
        self.entries.insert(key, value);
        self
    }

    /// Add an entry in place.
    pub fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    /// Number of entries across all prefixes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn scan_prefix<F>(&self, prefix: &[u8], mut visit: F) -> Result<(), StoreError>
    where
        F: FnMut(&[u8], &[u8]) -> ControlFlow<()>,
    {
        let entries = self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix));

        for (key, value) in entries {
            if visit(key.as_slice(), value.as_slice()).is_break() {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_keys(store: &MemoryStore, prefix: &[u8]) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        store
            .scan_prefix(prefix, |key, _| {
                keys.push(key.to_vec());
                ControlFlow::Continue(())
            })
            .unwrap();
        keys
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(collect_keys(&store, b"M:").is_empty());
    }

    #[test]
    fn test_scan_is_prefix_scoped_and_ordered() {
        let store = MemoryStore::new()
            .with_entry(b"M:b".to_vec(), vec![2])
            .with_entry(b"L:z".to_vec(), vec![0])
            .with_entry(b"M:a".to_vec(), vec![1])
            .with_entry(b"M;".to_vec(), vec![9])
            .with_entry(b"N:a".to_vec(), vec![3]);

        assert_eq!(store.len(), 5);
        assert_eq!(collect_keys(&store, b"M:"), vec![b"M:a".to_vec(), b"M:b".to_vec()]);
    }

    #[test]
    fn test_break_stops_scan() {
        let store = MemoryStore::new()
            .with_entry(b"M:1".to_vec(), vec![])
            .with_entry(b"M:2".to_vec(), vec![])
            .with_entry(b"M:3".to_vec(), vec![]);

        let mut visited = 0;
        store
            .scan_prefix(b"M:", |_, _| {
                visited += 1;
                if visited == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();

        assert_eq!(visited, 2);
    }
}
