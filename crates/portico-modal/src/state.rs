//! What the modal shows, as plain data.
//!
//! Presentation code renders a [`ModalState`] and nothing else: which tab
//! is selected, whether the submit button is spinning, and which message
//! to show. Every field is owned by [`AuthModal`](crate::AuthModal).

use portico_api::Identity;

/// Which form the modal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// The step an in-flight submission is at.
///
/// ```text
/// submit_login:    SigningIn ───────────────────────────→ done
/// submit_register: Registering ──→ SigningInAfterRegister ──→ done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    SigningIn,
    Registering,
    SigningInAfterRegister,
}

/// Why a submission failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A form field was blank. No request was sent.
    InvalidInput,
    /// Login failed: wrong credentials or the service was unreachable.
    LoginRejected,
    /// Registration failed: invalid data, duplicate email, or the service
    /// was unreachable.
    RegistrationRejected,
    /// The account was created but the automatic login after it failed.
    /// The user is registered and must sign in manually.
    RegisteredNotSignedIn,
}

/// A failure ready to show inline in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalFailure {
    pub kind: FailureKind,
    /// Human-readable text. Never contains a token or password.
    pub message: String,
}

impl ModalFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Where the modal is in its submit cycle.
///
/// ```text
///   Idle ──submit──→ Submitting ──→ Success  (session established, modal closed)
///     ↑                  │
///     │                  └────────→ Failed   (message shown, modal open)
///     │                                │
///     └──── close / switch_mode ───────┘      next submit → Submitting
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Idle,
    Submitting(SubmitStage),
    Success,
    Failed(ModalFailure),
}

impl ModalPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting(_))
    }

    pub fn failure(&self) -> Option<&ModalFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Everything presentation code needs to draw the modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalState {
    pub open: bool,
    pub mode: AuthMode,
    pub phase: ModalPhase,
}

impl ModalState {
    /// `true` while the form should be disabled.
    pub fn inputs_locked(&self) -> bool {
        self.phase.is_submitting()
    }
}

/// What a call to `submit_login` or `submit_register` ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A session was established for this identity and the modal closed.
    SignedIn(Identity),
    /// The attempt failed; the failure is also shown in the modal.
    Failed(ModalFailure),
    /// Nothing happened: another submission was in flight or the modal
    /// was closed.
    Ignored,
    /// The modal was closed or reset while this attempt was in flight.
    /// Its response was dropped and no session was established.
    Cancelled,
}
