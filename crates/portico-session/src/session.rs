//! Session types: what the store knows about the current user.
//!
//! A session answers one question for the whole client: "who is logged
//! in, if anyone, and do we know yet?"
//! - WHO: an [`Identity`] and the [`Credential`] that goes with it
//! - DO WE KNOW: the `loading` flag, true until durable storage has been
//!   checked

use portico_api::{Credential, Identity, UserId};
use serde::{Deserialize, Serialize};

use crate::SessionError;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key the session record is persisted under.
    ///
    /// Default: `"portico.session"`. Two clients sharing one storage
    /// backend need different keys.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "portico.session".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthenticatedUser
// ---------------------------------------------------------------------------

/// An identity together with its credential.
///
/// The two halves only ever travel together, so a snapshot can't hold an
/// identity without a token or a token without an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub identity: Identity,
    pub credential: Credential,
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// A point-in-time copy of the session, as handed to subscribers.
///
/// ```text
///   loading ──(restore found a record)──→ authenticated
///      │                                      │  ↑
///      └──(nothing stored / corrupt)──→ anonymous ──(login)
///                                          ↑      │
///                                          └(logout)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// `true` until persisted storage has been checked. Nothing should
    /// route on a snapshot that is still loading.
    pub loading: bool,

    /// The signed-in user, if any.
    pub auth: Option<AuthenticatedUser>,
}

impl SessionSnapshot {
    /// The state at process start: nothing known yet.
    pub fn loading() -> Self {
        Self {
            loading: true,
            auth: None,
        }
    }

    /// Storage has been checked and nobody is signed in.
    pub fn anonymous() -> Self {
        Self {
            loading: false,
            auth: None,
        }
    }

    /// Storage has been checked (or a login happened) and `user` is signed in.
    pub fn authenticated(user: AuthenticatedUser) -> Self {
        Self {
            loading: false,
            auth: Some(user),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.auth.as_ref().map(|user| &user.identity)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.auth.as_ref().map(|user| &user.credential)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// `true` once storage has been checked and nobody is signed in.
    pub fn is_anonymous(&self) -> bool {
        !self.loading && self.auth.is_none()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::loading()
    }
}

// ---------------------------------------------------------------------------
// PersistedSession
// ---------------------------------------------------------------------------

/// The record written to durable storage.
///
/// ```json
/// { "token": "T1", "user_id": 7, "display_name": "Foo" }
/// ```
///
/// The token is the only secret. The identity is stored beside it so a
/// reload can show the user's name without a network round trip.
#[derive(Serialize, Deserialize)]
pub(crate) struct PersistedSession {
    token: String,
    user_id: UserId,
    display_name: String,
}

impl PersistedSession {
    pub(crate) fn from_user(user: &AuthenticatedUser) -> Self {
        Self {
            token: user.credential.expose().to_string(),
            user_id: user.identity.id,
            display_name: user.identity.display_name.clone(),
        }
    }

    /// Rebuilds the user, rejecting records that decode but can't be right.
    pub(crate) fn into_user(self) -> Result<AuthenticatedUser, SessionError> {
        let credential = Credential::new(self.token)
            .ok_or_else(|| SessionError::Corrupt("blank token".into()))?;
        if self.display_name.trim().is_empty() {
            return Err(SessionError::Corrupt("blank display name".into()));
        }
        Ok(AuthenticatedUser {
            identity: Identity::new(self.user_id, self.display_name),
            credential,
        })
    }
}
