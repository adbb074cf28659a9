//! The login/register modal controller.
//!
//! [`AuthModal`] turns a form submission into exactly one of two results:
//! a session in the [`SessionStore`], or a failure shown in the modal.
//! Registration chains straight into a login with the same credentials,
//! and the case where the account was created but that login failed is
//! its own failure kind ([`FailureKind::RegisteredNotSignedIn`]).
//!
//! # Request identity
//!
//! Each submission takes a generation number. `close()`, `open()`, and
//! `switch_mode()` bump the generation, so a response that arrives after
//! the user walked away finds its generation stale and is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use portico_api::{ApiError, Credential, Identity, LoginResponse, RemoteApi};
use portico_session::SessionStore;
use portico_storage::Storage;
use tokio::sync::watch;

use crate::{
    AuthMode, FailureKind, LoginForm, ModalFailure, ModalPhase, ModalState, RegisterForm,
    SubmitOutcome, SubmitStage,
};

/// Drives the login and register flows against a [`RemoteApi`].
///
/// Methods take `&self`; share the modal behind an `Arc` if more than one
/// task needs it. Only one submission runs at a time; a second one while
/// the first is in flight returns [`SubmitOutcome::Ignored`].
pub struct AuthModal<A: RemoteApi, S: Storage> {
    api: A,
    session: SessionStore<S>,
    state: watch::Sender<ModalState>,
    generation: AtomicU64,
}

/// Result of trying to start a submission.
enum Start<T> {
    Go { generation: u64, request: T },
    Done(SubmitOutcome),
}

impl<A: RemoteApi, S: Storage> AuthModal<A, S> {
    /// Creates a closed modal in login mode.
    pub fn new(api: A, session: SessionStore<S>) -> Self {
        let (state, _) = watch::channel(ModalState::default());
        Self {
            api,
            session,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// A copy of the current modal state.
    pub fn state(&self) -> ModalState {
        self.state.borrow().clone()
    }

    /// Subscribes to modal state changes.
    pub fn subscribe(&self) -> watch::Receiver<ModalState> {
        self.state.subscribe()
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Opens the modal on `mode` with a clean slate.
    pub fn open(&self, mode: AuthMode) {
        self.reset(true, mode);
    }

    /// Switches between the login and register forms. Clears any message
    /// and drops an in-flight submission.
    pub fn switch_mode(&self, mode: AuthMode) {
        let open = self.state.borrow().open;
        self.reset(open, mode);
    }

    /// Closes the modal, clearing all transient state. A submission still
    /// in flight is cancelled: its response will be ignored.
    pub fn close(&self) {
        let mode = self.state.borrow().mode;
        self.reset(false, mode);
    }

    /// Signs in with `form`.
    ///
    /// On success the session is established and the modal closes. On
    /// failure the modal stays open and shows the message.
    pub async fn submit_login(&self, form: LoginForm) -> SubmitOutcome {
        let (generation, request) = match self.start(SubmitStage::SigningIn, form.validate()) {
            Start::Go {
                generation,
                request,
            } => (generation, request),
            Start::Done(outcome) => return outcome,
        };
        tracing::debug!(generation, "login submitted");
        let _unlock = SubmitGuard {
            modal: self,
            generation,
        };

        let result = self.api.login(&request).await.and_then(session_parts);
        match result {
            Ok((identity, credential)) => self.succeed(generation, identity, credential).await,
            Err(e) => {
                log_rejection("login", &e);
                let failure = ModalFailure::new(FailureKind::LoginRejected, e.user_message());
                self.fail(generation, failure, None)
            }
        }
    }

    /// Registers with `form`, then signs in with the same email and
    /// password without further user action.
    ///
    /// If registration succeeds but the sign-in does not, the outcome is
    /// [`FailureKind::RegisteredNotSignedIn`] and the modal switches to
    /// login mode so the user can retry.
    pub async fn submit_register(&self, form: RegisterForm) -> SubmitOutcome {
        let (generation, request) = match self.start(SubmitStage::Registering, form.validate()) {
            Start::Go {
                generation,
                request,
            } => (generation, request),
            Start::Done(outcome) => return outcome,
        };
        tracing::debug!(generation, "registration submitted");
        let _unlock = SubmitGuard {
            modal: self,
            generation,
        };

        if let Err(e) = self.api.register(&request).await {
            log_rejection("registration", &e);
            let failure = ModalFailure::new(FailureKind::RegistrationRejected, e.user_message());
            return self.fail(generation, failure, None);
        }

        if !self.advance(generation, SubmitStage::SigningInAfterRegister) {
            tracing::debug!(generation, "registration finished after modal was reset");
            return SubmitOutcome::Cancelled;
        }
        tracing::info!("account registered, signing in");

        let result = self
            .api
            .login(&request.to_login())
            .await
            .and_then(session_parts);
        match result {
            Ok((identity, credential)) => self.succeed(generation, identity, credential).await,
            Err(e) => {
                tracing::warn!(
                    kind = e.kind(),
                    error = %e,
                    "registered, but the automatic sign-in failed"
                );
                let failure = ModalFailure::new(
                    FailureKind::RegisteredNotSignedIn,
                    format!(
                        "Your account was created, but signing in failed ({}). Please sign in.",
                        e.user_message()
                    ),
                );
                self.fail(generation, failure, Some(AuthMode::Login))
            }
        }
    }

    // -- Transitions ----------------------------------------------------

    /// Atomically moves Idle/Failed → Submitting and takes a generation,
    /// or reports why nothing was started.
    fn start<T>(&self, stage: SubmitStage, checked: Result<T, ModalFailure>) -> Start<T> {
        let mut outcome = SubmitOutcome::Ignored;
        let mut generation = None;
        self.state.send_if_modified(|state| {
            if !state.open || state.phase.is_submitting() {
                return false;
            }
            match &checked {
                Ok(_) => {
                    generation = Some(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
                    state.phase = ModalPhase::Submitting(stage);
                }
                Err(failure) => {
                    outcome = SubmitOutcome::Failed(failure.clone());
                    state.phase = ModalPhase::Failed(failure.clone());
                }
            }
            true
        });

        match (generation, checked) {
            (Some(generation), Ok(request)) => Start::Go {
                generation,
                request,
            },
            _ => {
                if outcome == SubmitOutcome::Ignored {
                    tracing::debug!(?stage, "submission ignored");
                }
                Start::Done(outcome)
            }
        }
    }

    /// Moves to the next stage if `generation` is still current.
    fn advance(&self, generation: u64, stage: SubmitStage) -> bool {
        self.state.send_if_modified(|state| {
            if !self.is_current(generation) {
                return false;
            }
            state.phase = ModalPhase::Submitting(stage);
            true
        })
    }

    /// Claims the result for `generation`, establishes the session, and
    /// closes the modal.
    ///
    /// The session is published inside the claim, so a modal subscriber
    /// that sees `Success` always finds the user signed in.
    async fn succeed(
        &self,
        generation: u64,
        identity: Identity,
        credential: Credential,
    ) -> SubmitOutcome {
        let mut persist = None;
        self.state.send_if_modified(|state| {
            if !self.is_current(generation) {
                return false;
            }
            persist = Some(self.session.login(identity.clone(), credential));
            state.open = false;
            state.phase = ModalPhase::Success;
            true
        });
        let Some(persist) = persist else {
            tracing::debug!(generation, "sign-in response arrived after modal was reset");
            return SubmitOutcome::Cancelled;
        };

        persist.await;
        SubmitOutcome::SignedIn(identity)
    }

    /// Shows `failure` if `generation` is still current, optionally
    /// switching the form.
    fn fail(
        &self,
        generation: u64,
        failure: ModalFailure,
        mode: Option<AuthMode>,
    ) -> SubmitOutcome {
        let shown = self.state.send_if_modified(|state| {
            if !self.is_current(generation) {
                return false;
            }
            if let Some(mode) = mode {
                state.mode = mode;
            }
            state.phase = ModalPhase::Failed(failure.clone());
            true
        });
        if shown {
            SubmitOutcome::Failed(failure)
        } else {
            tracing::debug!(generation, "failure arrived after modal was reset");
            SubmitOutcome::Cancelled
        }
    }

    /// Invalidates any in-flight submission and clears transient state.
    fn reset(&self, open: bool, mode: AuthMode) {
        self.state.send_if_modified(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            let next = ModalState {
                open,
                mode,
                phase: ModalPhase::Idle,
            };
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
    }

    /// Only meaningful inside a `send_if_modified` closure, where the
    /// channel lock orders it against `reset`.
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

/// Drop guard for a running submission.
///
/// If the submit future is dropped mid-request (a `select!`, a timeout, a
/// torn-down view), the phase would stay `Submitting` and lock the form.
/// The guard moves it back to `Idle` unless the submission already
/// finished or the modal was reset since.
struct SubmitGuard<'a, A: RemoteApi, S: Storage> {
    modal: &'a AuthModal<A, S>,
    generation: u64,
}

impl<A: RemoteApi, S: Storage> Drop for SubmitGuard<'_, A, S> {
    fn drop(&mut self) {
        let unlocked = self.modal.state.send_if_modified(|state| {
            if !self.modal.is_current(self.generation) || !state.phase.is_submitting() {
                return false;
            }
            state.phase = ModalPhase::Idle;
            true
        });
        if unlocked {
            tracing::debug!(generation = self.generation, "submission dropped, form unlocked");
        }
    }
}

/// Splits a login response, rejecting one without a usable token.
fn session_parts(response: LoginResponse) -> Result<(Identity, Credential), ApiError> {
    response
        .into_session_parts()
        .ok_or_else(|| ApiError::Network("login response carried no token".into()))
}

fn log_rejection(flow: &'static str, error: &ApiError) {
    if error.is_user_input() {
        tracing::info!(flow, kind = error.kind(), "submission rejected");
    } else {
        tracing::warn!(flow, kind = error.kind(), error = %error, "submission failed");
    }
}
