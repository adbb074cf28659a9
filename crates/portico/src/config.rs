//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use portico_session::SessionConfig;

use crate::PorticoError;

/// Everything a Portico client needs to know about its surroundings.
///
/// | Field                  | Env var                        | Default                       |
/// |------------------------|--------------------------------|-------------------------------|
/// | `api_base_url`         | `PORTICO_API_URL`              | `http://127.0.0.1:8080/api`   |
/// | `storage_dir`          | `PORTICO_STORAGE_DIR`          | `.portico`                    |
/// | `storage_key`          | `PORTICO_STORAGE_KEY`          | `portico.session`             |
/// | `request_timeout_secs` | `PORTICO_REQUEST_TIMEOUT_SECS` | `10`                          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the game service.
    pub api_base_url: String,
    /// Directory the session record is stored in.
    pub storage_dir: PathBuf,
    /// Key (file name) of the session record.
    pub storage_key: String,
    /// Per-request timeout for remote calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/api".to_string(),
            storage_dir: PathBuf::from(".portico"),
            storage_key: SessionConfig::default().storage_key,
            request_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `PORTICO_*` environment variables, using
    /// the default for anything unset.
    ///
    /// # Errors
    /// Returns [`PorticoError::Config`] if a variable is set but invalid.
    pub fn from_env() -> Result<Self, PorticoError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PorticoError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let request_timeout_secs = match var("PORTICO_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(PorticoError::Config(format!(
                        "PORTICO_REQUEST_TIMEOUT_SECS must be a positive integer, got {raw:?}"
                    )));
                }
            },
            None => defaults.request_timeout_secs,
        };

        let config = Self {
            api_base_url: var("PORTICO_API_URL").unwrap_or(defaults.api_base_url),
            storage_dir: var("PORTICO_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            storage_key: var("PORTICO_STORAGE_KEY").unwrap_or(defaults.storage_key),
            request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks values that can't be expressed in the types.
    ///
    /// # Errors
    /// Returns [`PorticoError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<(), PorticoError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(PorticoError::Config(format!(
                "api_base_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(PorticoError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        portico_storage::validate_key(&self.storage_key)
            .map_err(|e| PorticoError::Config(format!("storage_key: {e}")))?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The session store settings derived from this config.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            storage_key: self.storage_key.clone(),
        }
    }
}
