//! Error types for the session layer.

use portico_api::CodecError;
use portico_storage::StorageError;

/// Errors that can occur while persisting or restoring a session.
///
/// None of these reach the store's callers: the store logs them and falls
/// back to "signed out". They are public so the meta crate can wrap them
/// and tests can match on them.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The persisted record couldn't be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The persisted record decoded but is unusable (blank token or name).
    #[error("persisted session is corrupt: {0}")]
    Corrupt(String),
}
