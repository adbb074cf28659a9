//! Unified error type for Portico.

use portico_api::{ApiError, CodecError};
use portico_session::SessionError;
use portico_storage::StorageError;

/// Top-level error that wraps all crate-specific errors.
///
/// The flows themselves never fail outward: the session store, modal, and
/// onboarding turn errors into states. This type is for setup code
/// (reading configuration, building the HTTP client) and for callers that
/// use the sub-crates directly and want one error to `?` into.
#[derive(Debug, thiserror::Error)]
pub enum PorticoError {
    /// Configuration was missing or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A remote API error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A storage backend error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A session persistence error.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A record encode/decode error.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_error() {
        let err: PorticoError = ApiError::Conflict("email taken".into()).into();
        assert!(matches!(err, PorticoError::Api(_)));
        assert_eq!(err.to_string(), "email taken");
    }

    #[test]
    fn test_from_storage_error() {
        let err: PorticoError = StorageError::InvalidKey("../x".into()).into();
        assert!(matches!(err, PorticoError::Storage(_)));
        assert!(err.to_string().contains("../x"));
    }

    #[test]
    fn test_from_session_error() {
        let err: PorticoError = SessionError::Corrupt("blank token".into()).into();
        assert!(matches!(err, PorticoError::Session(_)));
    }

    #[test]
    fn test_config_error_message() {
        let err = PorticoError::Config("PORTICO_REQUEST_TIMEOUT_SECS must be a positive integer".into());
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
