//! HTTP client for the game service, built on `reqwest`.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::{
    ApiError, Credential, LoginRequest, LoginResponse, PlayerStatus, RegisterRequest, RemoteApi,
};

/// [`RemoteApi`] over JSON/HTTP.
///
/// | Operation       | Request                                   |
/// |-----------------|-------------------------------------------|
/// | `register`      | `POST {base}/auth/register`               |
/// | `login`         | `POST {base}/auth/login`                  |
/// | `player_status` | `GET {base}/player/status` + bearer token |
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Creates a client for the service at `base_url`. Every request is
    /// abandoned after `timeout` and reported as [`ApiError::Timeout`].
    ///
    /// # Errors
    /// Returns [`ApiError::Network`] if the TLS backend can't be set up.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl RemoteApi for HttpApi {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("auth/register"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        check(response).await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url("auth/login"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        check(response)
            .await?
            .json::<LoginResponse>()
            .await
            .map_err(transport_error)
    }

    async fn player_status(&self, token: &Credential) -> Result<PlayerStatus, ApiError> {
        let response = self
            .client
            .get(self.url("player/status"))
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(transport_error)?;
        check(response)
            .await?
            .json::<PlayerStatus>()
            .await
            .map_err(transport_error)
    }
}

/// Passes successful responses through and turns the rest into the
/// matching [`ApiError`].
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "game service returned an error");
    Err(ApiError::from_status(status.as_u16(), error_message(&body, status)))
}

fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(error.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extracts the human-readable part of an error body.
///
/// The service answers `{"message": "..."}`; proxies in front of it may
/// answer plain text or nothing at all.
fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        trimmed.to_string()
    }
}
