//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{Storage, StorageError, validate_key};

/// [`Storage`] backed by a `HashMap`.
///
/// [`MemoryStorage::unavailable`] builds a store whose every call fails,
/// which is how a host with storage disabled looks to the session store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    unavailable: bool,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects every operation with
    /// [`StorageError::Unavailable`].
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.with_entries(|entries| entries.len())
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage is disabled".into()));
        }
        validate_key(key)
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut HashMap<String, Vec<u8>>) -> R) -> R {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut entries)
    }
}

impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.check(key)?;
        Ok(self.with_entries(|entries| entries.get(key).cloned()))
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.check(key)?;
        self.with_entries(|entries| entries.insert(key.to_string(), value.to_vec()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.with_entries(|entries| entries.remove(key));
        Ok(())
    }
}
