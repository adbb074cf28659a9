//! Types that cross the boundary between the client and the game API.
//!
//! Everything here is serialized as JSON by the HTTP client and the
//! session persistence layer. Field names are `snake_case` on the wire,
//! which is what the game service speaks.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user account.
///
/// Newtype over the numeric id the game service assigns at registration.
/// `#[serde(transparent)]` keeps it a plain number on the wire, so
/// `UserId(7)` is just `7` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// The minimal public record of a signed-in user.
///
/// This is what presentation code gets to see: an id for keys and a name
/// for the header and avatar. It never changes for the life of a session;
/// a new login produces a new `Identity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Account id.
    pub id: UserId,
    /// Name chosen at registration.
    pub display_name: String,
}

impl Identity {
    /// Creates an identity from its parts.
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// The opaque bearer token that proves a login to the game API.
///
/// The client never looks inside it. `Debug` prints `Credential(***)` so a
/// stray `{:?}` in a log line doesn't leak the secret. The raw string is
/// only reachable through [`Credential::expose`], which transports and the
/// persistence layer call; presentation code has no reason to.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token string. Returns `None` for blank tokens, which the
    /// game service never issues and which would only ever fail later.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of the login call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Body of the register call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(
        email: impl Into<String>,
        display_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            password: password.into(),
        }
    }

    /// The login request that follows a successful registration.
    pub fn to_login(&self) -> LoginRequest {
        LoginRequest::new(self.email.clone(), self.password.clone())
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// What the login call returns.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: UserId,
    pub display_name: String,
}

impl LoginResponse {
    /// Splits the response into the two halves the session store keeps.
    ///
    /// Returns `None` if the service sent a blank token; such a response
    /// can't establish a session.
    pub fn into_session_parts(self) -> Option<(Identity, Credential)> {
        let credential = Credential::new(self.token)?;
        Some((Identity::new(self.user_id, self.display_name), credential))
    }
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// The player's game record as reported by the service.
///
/// Only `character_created` matters to the client core. Everything else
/// (level, gold, location, ...) belongs to gameplay screens, so it is kept
/// as raw JSON in `stats` and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub character_created: bool,
    #[serde(flatten)]
    pub stats: serde_json::Map<String, serde_json::Value>,
}

impl PlayerStatus {
    /// A status with no gameplay fields.
    pub fn new(character_created: bool) -> Self {
        Self {
            character_created,
            stats: serde_json::Map::new(),
        }
    }
}
