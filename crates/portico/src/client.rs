//! `Portico` builder and client handle.
//!
//! This is the entry point for embedding Portico in a game client. It ties
//! together all the layers: remote API → session store → modal and
//! onboarding, all sharing one session.

use std::sync::Arc;

#[cfg(feature = "http")]
use portico_api::HttpApi;
use portico_api::RemoteApi;
use portico_modal::AuthModal;
use portico_onboarding::Onboarding;
use portico_session::SessionStore;
#[cfg(feature = "http")]
use portico_storage::FileStorage;
use portico_storage::Storage;
use tokio::task::JoinHandle;

use crate::{ClientConfig, PorticoError};

/// Builder for configuring a Portico client.
///
/// # Example
///
/// ```rust,ignore
/// use portico::prelude::*;
///
/// let client = PorticoBuilder::new()
///     .config(ClientConfig::from_env()?)
///     .build_http()?;
/// client.start();
/// ```
#[derive(Debug, Default)]
pub struct PorticoBuilder {
    config: ClientConfig,
}

impl PorticoBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds a client over any API and storage backend.
    ///
    /// Only the session settings of the config are used; the API and the
    /// storage come ready-made.
    ///
    /// # Errors
    /// Returns [`PorticoError::Config`] if the config is invalid.
    pub fn build<A: RemoteApi, S: Storage>(
        self,
        api: A,
        storage: S,
    ) -> Result<Portico<A, S>, PorticoError> {
        self.config.validate()?;

        let api = Arc::new(api);
        let session = SessionStore::new(storage, self.config.session_config());
        let modal = AuthModal::new(Arc::clone(&api), session.clone());
        let onboarding = Onboarding::new(Arc::clone(&api), session.clone());

        Ok(Portico {
            config: self.config,
            api,
            session,
            modal,
            onboarding,
        })
    }

    /// Builds the production client: [`HttpApi`] against
    /// `api_base_url`, [`FileStorage`] under `storage_dir`.
    ///
    /// # Errors
    /// Returns [`PorticoError::Config`] for an invalid config, or
    /// [`PorticoError::Api`] if the HTTP client can't be created.
    #[cfg(feature = "http")]
    pub fn build_http(self) -> Result<Portico<HttpApi, FileStorage>, PorticoError> {
        self.config.validate()?;
        let api = HttpApi::new(&self.config.api_base_url, self.config.request_timeout())?;
        let storage = FileStorage::new(&self.config.storage_dir);
        self.build(api, storage)
    }
}

/// A Portico client: one session, one modal, one onboarding flow.
///
/// Call [`start()`](Self::start) once at process start to restore the
/// persisted session.
pub struct Portico<A: RemoteApi, S: Storage> {
    config: ClientConfig,
    api: Arc<A>,
    session: SessionStore<S>,
    modal: AuthModal<Arc<A>, S>,
    onboarding: Onboarding<Arc<A>, S>,
}

impl<A: RemoteApi, S: Storage> Portico<A, S> {
    /// Restores the persisted session in the background.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) -> JoinHandle<()> {
        tracing::info!(
            api = %self.config.api_base_url,
            storage_key = %self.config.storage_key,
            "Portico client starting"
        );
        self.session.initialize()
    }

    /// Signs out and tears down whatever the old session was doing: an
    /// open modal is closed and a pending onboarding answer is dropped.
    pub async fn logout(&self) {
        self.modal.close();
        self.onboarding.cancel();
        self.session.logout().await;
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn modal(&self) -> &AuthModal<Arc<A>, S> {
        &self.modal
    }

    pub fn onboarding(&self) -> &Onboarding<Arc<A>, S> {
        &self.onboarding
    }
}
