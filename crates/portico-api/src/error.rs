//! Error types for the API layer.
//!
//! [`ApiError`] is the taxonomy every remote call fails with, no matter
//! which client produced it. The flows above split it in two:
//!
//! - **User input problems** (`Validation`, `Auth`, `Conflict`) are shown
//!   inline in the login/register modal.
//! - **Soft signals** (`NotFound`, `Network`, `Timeout`) are never shown
//!   as text during onboarding; they route the player to character
//!   creation instead.

/// Errors a remote game API call can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed: missing fields, bad email, weak password.
    #[error("{0}")]
    Validation(String),

    /// Wrong credentials, or the token was rejected.
    #[error("{0}")]
    Auth(String),

    /// The account already exists.
    #[error("{0}")]
    Conflict(String),

    /// The requested record doesn't exist. For player status this is the
    /// normal answer for a brand-new account.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service couldn't be reached or answered with something
    /// unusable (5xx, garbage body, dropped connection).
    #[error("network error: {0}")]
    Network(String),

    /// No response within the configured request timeout. Treated exactly
    /// like a network failure by every caller.
    #[error("request timed out")]
    Timeout,
}

impl ApiError {
    /// Maps an HTTP status code and body to the taxonomy.
    ///
    /// 400/422 → Validation, 401/403 → Auth, 404 → NotFound,
    /// 409 → Conflict, anything else → Network.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => Self::Validation(message),
            401 | 403 => Self::Auth(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Network(format!("HTTP {status}: {message}")),
        }
    }

    /// `true` for errors caused by what the user typed.
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Auth(_) | Self::Conflict(_))
    }

    /// `true` for failures to reach the service at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// Short name of the error class, for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Auth(_) => "auth",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Network(_) => "network",
            Self::Timeout => "timeout",
        }
    }

    /// The text shown to the user in the modal.
    ///
    /// Input errors carry the service's own wording. Connectivity problems
    /// get a generic message; the details go to the log, not the screen.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Auth(msg) | Self::Conflict(msg)
                if !msg.trim().is_empty() =>
            {
                msg.clone()
            }
            Self::Validation(_) => "Please check the form and try again.".into(),
            Self::Auth(_) => "Invalid email or password.".into(),
            Self::Conflict(_) => "An account with this email already exists.".into(),
            Self::NotFound(_) | Self::Network(_) | Self::Timeout => {
                "Could not reach the game server. Please try again.".into()
            }
        }
    }
}

/// Errors that can occur while encoding or decoding a persisted record.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The bytes are not a valid record: malformed JSON, missing fields,
    /// or wrong types.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
