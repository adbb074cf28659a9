//! Entry-screen routing for Portico.
//!
//! Once the session is known, [`Onboarding`] decides between the landing
//! page, character creation, and the game. A missing player record is the
//! normal state of a brand-new account, so it routes to character creation
//! like every other status failure; only the log tells them apart.
//!
//! # How it fits in the stack
//!
//! ```text
//! Presentation (above)  ← subscribes to decisions, calls resolve_entry_screen
//!     ↕
//! Onboarding (this crate)
//!     ↕
//! RemoteApi::player_status + SessionStore (below)
//! ```

mod decision;
mod flow;

pub use decision::{Decision, EntryScreen, OnboardingReason, RequestId};
pub use flow::Onboarding;
