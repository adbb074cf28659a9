//! The login/register modal for Portico.
//!
//! The modal is a small state machine over [`ModalState`]:
//!
//! - **Forms** ([`LoginForm`], [`RegisterForm`]): what the user typed
//! - **Controller** ([`AuthModal`]): submits forms to the remote API,
//!   chains registration into login, hands the result to the session store
//! - **State** ([`ModalState`], [`ModalPhase`], [`SubmitOutcome`]): what to
//!   draw and what happened
//!
//! # How it fits in the stack
//!
//! ```text
//! Presentation (above)  ← renders ModalState, calls submit_*/close
//!     ↕
//! Modal (this crate)    ← one session or one message per attempt
//!     ↕
//! RemoteApi + SessionStore (below)
//! ```

mod form;
mod modal;
mod state;

pub use form::{LoginForm, RegisterForm};
pub use modal::AuthModal;
pub use state::{
    AuthMode, FailureKind, ModalFailure, ModalPhase, ModalState, SubmitOutcome, SubmitStage,
};
