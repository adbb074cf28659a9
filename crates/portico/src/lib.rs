//! # Portico
//!
//! Session and onboarding core for browser game clients.
//!
//! Portico owns "who is logged in" on the client, keeps it across
//! restarts, runs the login/register modal against the game service, and
//! decides which screen comes first: landing, character creation, or the
//! game. Presentation code subscribes to state and renders it; it never
//! holds session state of its own.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use portico::prelude::*;
//!
//! portico::init_tracing();
//! let client = PorticoBuilder::new()
//!     .config(ClientConfig::from_env()?)
//!     .build_http()?;
//! client.start();
//!
//! client.modal().open(AuthMode::Login);
//! client.modal().submit_login(LoginForm::new("a@x.com", "secret")).await;
//! match client.onboarding().resolve_entry_screen().await {
//!     Some(EntryScreen::Game) => { /* show the game */ }
//!     Some(EntryScreen::CreateCharacter) => { /* show character creation */ }
//!     Some(EntryScreen::Landing) | None => {}
//! }
//! ```

mod client;
mod config;
mod error;

pub use client::{Portico, PorticoBuilder};
pub use config::ClientConfig;
pub use error::PorticoError;

/// Installs a `tracing` subscriber that prints to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless: later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub mod prelude {
    //! Everything a client embedding Portico usually needs.

    #[cfg(feature = "http")]
    pub use portico_api::HttpApi;
    #[cfg(feature = "memory")]
    pub use portico_api::InMemoryApi;
    pub use portico_api::{ApiError, Credential, Identity, PlayerStatus, RemoteApi, UserId};
    pub use portico_modal::{
        AuthModal, AuthMode, FailureKind, LoginForm, ModalFailure, ModalPhase, ModalState,
        RegisterForm, SubmitOutcome, SubmitStage,
    };
    pub use portico_onboarding::{Decision, EntryScreen, Onboarding, OnboardingReason, RequestId};
    pub use portico_session::{
        AuthenticatedUser, SessionConfig, SessionSnapshot, SessionStore, SessionSubscription,
    };
    pub use portico_storage::{FileStorage, MemoryStorage, Storage, StorageError};

    pub use crate::{ClientConfig, Portico, PorticoBuilder, PorticoError};
}
