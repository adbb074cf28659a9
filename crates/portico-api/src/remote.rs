//! The remote game API as the client sees it.
//!
//! Portico doesn't authenticate anyone itself. Registration, login, and
//! the player record all live in the game service; [`RemoteApi`] is the
//! seam the rest of the client talks to. [`HttpApi`](crate::HttpApi) is
//! the production implementation, [`InMemoryApi`](crate::InMemoryApi) a
//! local stand-in for demos and tests.
//!
//! Timeouts belong to the implementation. Callers treat
//! [`ApiError::Timeout`] exactly like any other failed call.

use std::future::Future;
use std::sync::Arc;

use crate::{ApiError, Credential, LoginRequest, LoginResponse, PlayerStatus, RegisterRequest};

/// The three operations the client needs from the game service.
///
/// Methods return `impl Future + Send` so flows can hand calls to the
/// tokio runtime. Implementations may simply write `async fn`.
///
/// # Example
///
/// ```rust
/// use portico_api::{
///     ApiError, Credential, LoginRequest, LoginResponse, PlayerStatus,
///     RegisterRequest, RemoteApi, UserId,
/// };
///
/// /// Lets exactly one account in and reports no character yet.
/// struct SingleUser;
///
/// impl RemoteApi for SingleUser {
///     async fn register(&self, _req: &RegisterRequest) -> Result<(), ApiError> {
///         Err(ApiError::Conflict("already registered".into()))
///     }
///
///     async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
///         if req.email == "a@x.com" && req.password == "secret" {
///             Ok(LoginResponse {
///                 token: "T1".into(),
///                 user_id: UserId(7),
///                 display_name: "Foo".into(),
///             })
///         } else {
///             Err(ApiError::Auth("invalid email or password".into()))
///         }
///     }
///
///     async fn player_status(&self, _token: &Credential) -> Result<PlayerStatus, ApiError> {
///         Ok(PlayerStatus::new(false))
///     }
/// }
/// ```
pub trait RemoteApi: Send + Sync + 'static {
    /// Creates an account. Succeeds with no payload; the caller logs in
    /// afterwards to obtain a token.
    ///
    /// Fails with `Validation` or `Conflict` for bad input.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Exchanges email and password for a token and the public identity.
    ///
    /// Fails with `Auth` for wrong credentials.
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// Fetches the player record of the account `token` belongs to.
    ///
    /// Fails with `NotFound` when the account has no player record yet.
    fn player_status(
        &self,
        token: &Credential,
    ) -> impl Future<Output = Result<PlayerStatus, ApiError>> + Send;
}

impl<T: RemoteApi> RemoteApi for Arc<T> {
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).register(request)
    }

    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send {
        (**self).login(request)
    }

    fn player_status(
        &self,
        token: &Credential,
    ) -> impl Future<Output = Result<PlayerStatus, ApiError>> + Send {
        (**self).player_status(token)
    }
}
