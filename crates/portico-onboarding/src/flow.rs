//! The onboarding decision flow.
//!
//! Answers "which screen now?" from two pieces of remote state: is anyone
//! signed in, and does their character exist. The answer is never given
//! while the session is still loading, and a late answer for a request
//! that was cancelled or overtaken is thrown away.

use std::sync::atomic::{AtomicU64, Ordering};

use portico_api::{ApiError, Credential, RemoteApi};
use portico_session::SessionStore;
use portico_storage::Storage;
use tokio::sync::watch;

use crate::{Decision, EntryScreen, OnboardingReason, RequestId};

/// Decides the entry screen and publishes each decision.
///
/// | session       | player status                  | screen            |
/// |---------------|--------------------------------|-------------------|
/// | anonymous     | not asked                      | `Landing`         |
/// | signed in     | `character_created = true`     | `Game`            |
/// | signed in     | `character_created = false`    | `CreateCharacter` |
/// | signed in     | any error, `NotFound` included | `CreateCharacter` |
pub struct Onboarding<A: RemoteApi, S: Storage> {
    api: A,
    session: SessionStore<S>,
    decision: watch::Sender<Option<Decision>>,
    /// Id of the most recent request. Anything older is stale.
    latest: AtomicU64,
}

impl<A: RemoteApi, S: Storage> Onboarding<A, S> {
    pub fn new(api: A, session: SessionStore<S>) -> Self {
        let (decision, _) = watch::channel(None);
        Self {
            api,
            session,
            decision,
            latest: AtomicU64::new(0),
        }
    }

    /// The last published decision, if any.
    pub fn decision(&self) -> Option<Decision> {
        *self.decision.borrow()
    }

    /// Subscribes to published decisions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Decision>> {
        self.decision.subscribe()
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Works out where the user should go, publishes it, and returns it.
    ///
    /// Waits for the session to finish loading first. For a signed-in
    /// user this queries the player status, so call it on an explicit
    /// user action ("Play"), not on every render.
    ///
    /// Returns `None` if the answer became irrelevant while it was being
    /// worked out: [`cancel`](Self::cancel) was called, a newer request
    /// started, or the session changed hands. Nothing is published then.
    pub async fn resolve_entry_screen(&self) -> Option<EntryScreen> {
        let request = RequestId(self.latest.fetch_add(1, Ordering::SeqCst) + 1);

        let snapshot = self.session.ready().await;
        if !self.is_current(request) {
            tracing::debug!(%request, "entry screen request cancelled while session loaded");
            return None;
        }

        let Some(user) = snapshot.auth else {
            return self.publish(request, None, EntryScreen::Landing, OnboardingReason::Anonymous);
        };

        let user_id = user.identity.id;
        let (screen, reason) = match self.api.player_status(&user.credential).await {
            Ok(status) if status.character_created => {
                (EntryScreen::Game, OnboardingReason::CharacterReady)
            }
            Ok(_) => (EntryScreen::CreateCharacter, OnboardingReason::NoCharacter),
            Err(ApiError::NotFound(_)) => {
                tracing::info!(%user_id, "no player record yet");
                (EntryScreen::CreateCharacter, OnboardingReason::NoPlayerRecord)
            }
            Err(e) => {
                tracing::warn!(
                    %user_id,
                    kind = e.kind(),
                    error = %e,
                    "player status unavailable, falling back to character creation"
                );
                (EntryScreen::CreateCharacter, OnboardingReason::StatusUnavailable)
            }
        };

        self.publish(request, Some(&user.credential), screen, reason)
    }

    /// `Some(Landing)` if the session is ready and nobody is signed in,
    /// `None` otherwise. Never calls the API and never publishes.
    pub fn landing_if_anonymous(&self) -> Option<EntryScreen> {
        self.session
            .current()
            .is_anonymous()
            .then_some(EntryScreen::Landing)
    }

    /// Drops the in-flight request, if any, and withdraws the published
    /// decision. Call when the welcome screen goes away or the user signs
    /// out; subscribers then see `None` until the next resolve.
    pub fn cancel(&self) {
        let stale = self.latest.fetch_add(1, Ordering::SeqCst);
        let withdrawn = self.decision.send_if_modified(|decision| decision.take().is_some());
        tracing::debug!(request = %RequestId(stale), withdrawn, "entry screen request cancelled");
    }

    /// Publishes and returns `screen` if `request` is still the latest and
    /// the session still holds `credential`.
    fn publish(
        &self,
        request: RequestId,
        credential: Option<&Credential>,
        screen: EntryScreen,
        reason: OnboardingReason,
    ) -> Option<EntryScreen> {
        let mut stale = false;
        self.decision.send_if_modified(|decision| {
            let current = self.session.current();
            if !self.is_current(request) || current.loading || current.credential() != credential {
                stale = true;
                return false;
            }
            let next = Decision {
                screen,
                reason,
                request,
            };
            let changed = *decision != Some(next);
            *decision = Some(next);
            changed
        });

        if stale {
            tracing::debug!(%request, %screen, "entry screen decision superseded");
            return None;
        }
        tracing::info!(%request, %screen, ?reason, "entry screen decided");
        Some(screen)
    }

    fn is_current(&self, request: RequestId) -> bool {
        self.latest.load(Ordering::SeqCst) == request.0
    }
}
