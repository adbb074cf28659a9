//! Durable key/value storage for Portico.
//!
//! Provides the [`Storage`] trait the session store persists its record
//! through, plus two backends:
//!
//! - [`MemoryStorage`]: a map in memory; survives nothing, good for tests
//!   and for hosts without durable storage.
//! - [`FileStorage`]: one file per key under a directory; survives
//!   process restarts.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::future::Future;
use std::sync::Arc;

/// A small async key/value store.
///
/// Values are opaque bytes. The trait is `Send + Sync + 'static` and its
/// futures are `Send`, so a store can be shared with background tasks.
pub trait Storage: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if there is none.
    fn read(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(
        &self,
        key: &str,
        value: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Deletes the value under `key`. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<T: Storage> Storage for Arc<T> {
    fn read(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send {
        (**self).read(key)
    }

    fn write(
        &self,
        key: &str,
        value: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).remove(key)
    }
}

/// Checks that `key` is non-empty and made of `[A-Za-z0-9._-]` only, and
/// isn't a relative path component (`.` or `..`).
///
/// The restriction keeps keys portable: they are valid file names on every
/// platform and valid `localStorage` keys in a browser.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    if key.is_empty() || key == "." || key == ".." || !key.chars().all(allowed) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
