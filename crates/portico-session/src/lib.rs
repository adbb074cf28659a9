//! Client session management for Portico.
//!
//! This crate owns the answer to "who is logged in on this client":
//!
//! 1. **Session state**: identity, credential, and whether storage has
//!    been checked yet ([`SessionSnapshot`])
//! 2. **Transitions**: restore on startup, login, logout ([`SessionStore`])
//! 3. **Observation**: subscribers are pushed every change
//!    ([`SessionSubscription`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Modal / Onboarding (above)  ← call login(), subscribe to changes
//!     ↕
//! Session Layer (this crate)  ← holds the session, persists it
//!     ↕
//! Storage (below)  ← durable key/value bytes
//! ```

mod error;
mod session;
mod store;

pub use error::SessionError;
pub use session::{AuthenticatedUser, SessionConfig, SessionSnapshot};
pub use store::{SessionStore, SessionSubscription};
