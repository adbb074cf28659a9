//! The session store: the one place that knows who is logged in.
//!
//! Every change goes through three doors: [`SessionStore::initialize`],
//! [`SessionStore::login`], and [`SessionStore::logout`]. Each one
//! publishes a new [`SessionSnapshot`] on a `watch` channel, which is the
//! store's subscriber list. Presentation code subscribes and reacts; it
//! never polls and never mutates.
//!
//! # Ordering
//!
//! - The in-memory snapshot changes first and synchronously; durable
//!   storage follows.
//! - Storage operations (restore read, login write, logout remove) run one
//!   at a time in call order, behind an async mutex. A `logout()` that
//!   is still removing the record therefore finishes before a following
//!   `initialize()` reads it.
//! - A restore result is only applied if nothing else changed the session
//!   since `initialize()` started (an epoch counter), so a slow read never
//!   overwrites a fresher login.
//!
//! # Failure
//!
//! The store never returns an error. Storage that is missing, broken, or
//! full degrades to "signed out", with a `warn` in the log.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use portico_api::{Codec, Credential, Identity, JsonCodec};
use portico_storage::Storage;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::session::PersistedSession;
use crate::{AuthenticatedUser, SessionConfig, SessionError, SessionSnapshot};

/// Handle to the client's session.
///
/// Cheap to clone: every clone points at the same state. Create exactly
/// one per client process and hand clones to whoever needs it.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ [loading] ──initialize()──→ [authenticated] or [anonymous]
///                                            │    ↑           │    ↑
///                                    logout()│    └──login()──┘    │
///                                            └─────────────────────┘
/// ```
pub struct SessionStore<S: Storage> {
    inner: Arc<Inner<S>>,
}

impl<S: Storage> Clone for SessionStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    storage: S,
    codec: JsonCodec,
    config: SessionConfig,

    /// Latest snapshot plus every subscriber.
    state: watch::Sender<SessionSnapshot>,

    /// Bumped by every `initialize`, `login`, and `logout`. A restore only
    /// applies its result if the epoch it started under is still current.
    epoch: AtomicU64,

    /// Serializes storage access so reads, writes, and removes land in
    /// call order.
    io: Mutex<()>,
}

impl<S: Storage> SessionStore<S> {
    /// Creates a store in the `loading` state. Call
    /// [`initialize`](Self::initialize) to restore a persisted session.
    pub fn new(storage: S, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::loading());
        Self {
            inner: Arc::new(Inner {
                storage,
                codec: JsonCodec,
                config,
                state,
                epoch: AtomicU64::new(0),
                io: Mutex::new(()),
            }),
        }
    }

    /// Restores the persisted session in the background.
    ///
    /// Marks the snapshot as loading right away and returns without
    /// waiting. The restore task always ends by publishing a non-loading
    /// snapshot: the stored user if the record is valid, anonymous if it
    /// is missing, corrupt, or storage fails. That holds even if the task
    /// panics or is dropped before it finishes.
    ///
    /// The returned handle is only needed by callers that want to wait
    /// for the restore; subscribers see the result either way.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn initialize(&self) -> JoinHandle<()> {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|snap| snap.loading = true);
        tracing::debug!(epoch, "restoring persisted session");

        let guard = RestoreGuard {
            inner: Arc::clone(&self.inner),
            epoch,
            finished: false,
        };
        tokio::spawn(async move {
            let restored = guard.inner.restore().await;
            guard.finish(restored);
        })
    }

    /// Signs `identity` in with `credential`, replacing any previous
    /// session.
    ///
    /// Subscribers see the new session as soon as this is called, before
    /// the returned future is first polled. The future writes the record
    /// to storage; if that fails the session stays valid in memory and the
    /// failure is logged.
    pub fn login(
        &self,
        identity: Identity,
        credential: Credential,
    ) -> impl Future<Output = ()> + Send + 'static {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        let user = AuthenticatedUser {
            identity,
            credential,
        };
        let record = PersistedSession::from_user(&user);
        let user_id = user.identity.id;

        self.inner
            .state
            .send_replace(SessionSnapshot::authenticated(user));
        tracing::info!(%user_id, "signed in");

        let inner = Arc::clone(&self.inner);
        async move {
            if let Err(e) = inner.persist(&record).await {
                tracing::warn!(
                    %user_id,
                    error = %e,
                    "could not persist session, it will not survive a reload"
                );
            }
        }
    }

    /// Signs out: clears the in-memory session and the persisted record.
    ///
    /// Idempotent. Subscribers are only notified if something changed.
    pub async fn logout(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        let signed_out = self.inner.state.send_if_modified(|snap| {
            if snap.is_anonymous() {
                return false;
            }
            *snap = SessionSnapshot::anonymous();
            true
        });
        if signed_out {
            tracing::info!("signed out");
        }

        if let Err(e) = self.inner.erase().await {
            tracing::warn!(error = %e, "could not remove persisted session");
        }
    }

    /// A copy of the current snapshot.
    pub fn current(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.inner.state.subscribe(),
        }
    }

    /// Waits until the snapshot is no longer loading and returns it.
    pub async fn ready(&self) -> SessionSnapshot {
        match self.subscribe().ready().await {
            Some(snapshot) => snapshot,
            None => self.current(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }
}

impl<S: Storage> Inner<S> {
    /// Reads and validates the persisted record. Never fails: every
    /// problem is logged and reported as "nothing stored".
    async fn restore(&self) -> Option<AuthenticatedUser> {
        let _io = self.io.lock().await;
        let key = self.config.storage_key.as_str();

        let bytes = match self.storage.read(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("no persisted session");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "session storage unavailable, starting signed out");
                return None;
            }
        };

        match self.decode(&bytes) {
            Ok(user) => {
                tracing::info!(user_id = %user.identity.id, "session restored");
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable persisted session");
                if let Err(e) = self.storage.remove(key).await {
                    tracing::warn!(error = %e, "could not remove unreadable session");
                }
                None
            }
        }
    }

    /// Publishes a restore result unless the session moved on meanwhile.
    fn apply_restore(&self, epoch: u64, restored: Option<AuthenticatedUser>) -> bool {
        self.state.send_if_modified(|snap| {
            if self.epoch.load(Ordering::SeqCst) != epoch || !snap.loading {
                return false;
            }
            *snap = match restored {
                Some(user) => SessionSnapshot::authenticated(user),
                None => SessionSnapshot::anonymous(),
            };
            true
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<AuthenticatedUser, SessionError> {
        self.codec.decode::<PersistedSession>(bytes)?.into_user()
    }

    async fn persist(&self, record: &PersistedSession) -> Result<(), SessionError> {
        let bytes = self.codec.encode(record)?;
        let _io = self.io.lock().await;
        self.storage.write(&self.config.storage_key, &bytes).await?;
        Ok(())
    }

    async fn erase(&self) -> Result<(), SessionError> {
        let _io = self.io.lock().await;
        self.storage.remove(&self.config.storage_key).await?;
        Ok(())
    }
}

/// Drop guard that completes a restore on every exit path.
///
/// If the restore task panics or is cancelled before it publishes, the
/// guard publishes "signed out" so the snapshot never stays loading.
struct RestoreGuard<S: Storage> {
    inner: Arc<Inner<S>>,
    epoch: u64,
    finished: bool,
}

impl<S: Storage> RestoreGuard<S> {
    fn finish(mut self, restored: Option<AuthenticatedUser>) {
        self.finished = true;
        if !self.inner.apply_restore(self.epoch, restored) {
            tracing::debug!(epoch = self.epoch, "restore superseded, result dropped");
        }
    }
}

impl<S: Storage> Drop for RestoreGuard<S> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("session restore ended early, starting signed out");
            self.inner.apply_restore(self.epoch, None);
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSubscription
// ---------------------------------------------------------------------------

/// A subscriber's view of the session.
pub struct SessionSubscription {
    receiver: watch::Receiver<SessionSnapshot>,
}

impl SessionSubscription {
    /// The latest snapshot. Marks it as seen.
    pub fn snapshot(&mut self) -> SessionSnapshot {
        self.receiver.borrow_and_update().clone()
    }

    /// Waits for the next change and returns the new snapshot.
    ///
    /// Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<SessionSnapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Waits until the snapshot is no longer loading and returns it.
    /// Returns immediately if it already isn't.
    ///
    /// Returns `None` if the store is dropped while still loading.
    pub async fn ready(&mut self) -> Option<SessionSnapshot> {
        self.receiver
            .wait_for(|snap| !snap.loading)
            .await
            .ok()
            .map(|snap| snap.clone())
    }
}

// =========================================================================
// Tests
// =========================================================================
