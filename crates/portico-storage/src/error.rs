//! Error types for the storage layer.

/// Errors that can occur in the storage layer.
///
/// The session store never passes these up to its callers. It logs them
/// and carries on as if nothing was stored.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend can't be used at all (disabled, quota exhausted,
    /// private browsing mode, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The key contains characters the backend can't store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Reading or writing the underlying file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
