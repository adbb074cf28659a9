//! An in-process stand-in for the game service.
//!
//! [`InMemoryApi`] behaves like the real service as far as the client can
//! tell: it validates registrations, rejects duplicate emails, issues
//! random bearer tokens, and answers `NotFound` for player status until a
//! player record exists. Tests can also script failures and add latency so
//! concurrent submissions actually overlap.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;

use crate::{
    ApiError, Credential, LoginRequest, LoginResponse, PlayerStatus, RegisterRequest, RemoteApi,
    UserId,
};

/// Minimum password length the stand-in accepts.
const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user_id: UserId,
    display_name: String,
    password: String,
    /// `None` until the game creates a player record for the account.
    player: Option<PlayerStatus>,
}

#[derive(Default)]
struct Scripted {
    register: VecDeque<ApiError>,
    login: VecDeque<ApiError>,
    status: VecDeque<ApiError>,
}

/// Number of calls each operation has received.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallCounts {
    pub register: usize,
    pub login: usize,
    pub player_status: usize,
}

#[derive(Default)]
struct Directory {
    /// Accounts keyed by normalized email.
    accounts: HashMap<String, Account>,
    /// Issued tokens → normalized email.
    tokens: HashMap<String, String>,
    next_id: u64,
    scripted: Scripted,
    calls: CallCounts,
}

/// In-memory [`RemoteApi`].
///
/// Uses a `std::sync::Mutex` because no lock is ever held across an
/// `.await`; the optional latency is slept before the lock is taken.
#[derive(Default)]
pub struct InMemoryApi {
    directory: Mutex<Directory>,
    latency: Option<Duration>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits `latency` before it is processed.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// The next `register` call fails with `error` instead of running.
    pub fn fail_next_register(&self, error: ApiError) {
        self.with_directory(|dir| dir.scripted.register.push_back(error));
    }

    /// The next `login` call fails with `error` instead of running.
    pub fn fail_next_login(&self, error: ApiError) {
        self.with_directory(|dir| dir.scripted.login.push_back(error));
    }

    /// The next `player_status` call fails with `error` instead of running.
    pub fn fail_next_status(&self, error: ApiError) {
        self.with_directory(|dir| dir.scripted.status.push_back(error));
    }

    /// Gives the account behind `token` a player record with no character.
    /// Returns `false` if the token is unknown.
    pub fn open_player_record(&self, token: &Credential) -> bool {
        self.set_player(token, PlayerStatus::new(false))
    }

    /// Marks the character of the account behind `token` as created.
    /// Returns `false` if the token is unknown.
    pub fn create_character(&self, token: &Credential) -> bool {
        self.set_player(token, PlayerStatus::new(true))
    }

    /// How many times each operation has been called.
    pub fn calls(&self) -> CallCounts {
        self.with_directory(|dir| dir.calls)
    }

    fn set_player(&self, token: &Credential, status: PlayerStatus) -> bool {
        self.with_directory(|dir| {
            let Some(email) = dir.tokens.get(token.expose()).cloned() else {
                return false;
            };
            match dir.accounts.get_mut(&email) {
                Some(account) => {
                    account.player = Some(status);
                    true
                }
                None => false,
            }
        })
    }

    fn with_directory<R>(&self, f: impl FnOnce(&mut Directory) -> R) -> R {
        // A poisoned lock only means a test panicked mid-call; the data is
        // still consistent enough for a stand-in.
        let mut dir = match self.directory.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut dir)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl RemoteApi for InMemoryApi {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.delay().await;
        self.with_directory(|dir| {
            dir.calls.register += 1;
            if let Some(error) = dir.scripted.register.pop_front() {
                return Err(error);
            }

            validate_registration(request)?;
            let email = normalize_email(&request.email);
            if dir.accounts.contains_key(&email) {
                return Err(ApiError::Conflict(
                    "an account with this email already exists".into(),
                ));
            }

            dir.next_id += 1;
            let user_id = UserId(dir.next_id);
            dir.accounts.insert(
                email,
                Account {
                    user_id,
                    display_name: request.display_name.trim().to_string(),
                    password: request.password.clone(),
                    player: None,
                },
            );
            tracing::debug!(%user_id, "account registered");
            Ok(())
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.delay().await;
        self.with_directory(|dir| {
            dir.calls.login += 1;
            if let Some(error) = dir.scripted.login.pop_front() {
                return Err(error);
            }

            let email = normalize_email(&request.email);
            let account = dir
                .accounts
                .get(&email)
                .filter(|account| account.password == request.password)
                .ok_or_else(|| ApiError::Auth("invalid email or password".into()))?;

            let response = LoginResponse {
                token: generate_token(),
                user_id: account.user_id,
                display_name: account.display_name.clone(),
            };
            dir.tokens.insert(response.token.clone(), email);
            Ok(response)
        })
    }

    async fn player_status(&self, token: &Credential) -> Result<PlayerStatus, ApiError> {
        self.delay().await;
        self.with_directory(|dir| {
            dir.calls.player_status += 1;
            if let Some(error) = dir.scripted.status.pop_front() {
                return Err(error);
            }

            let email = dir
                .tokens
                .get(token.expose())
                .ok_or_else(|| ApiError::Auth("token not recognized".into()))?;
            dir.accounts
                .get(email)
                .and_then(|account| account.player.clone())
                .ok_or_else(|| ApiError::NotFound("no player record".into()))
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    let email = request.email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(ApiError::Validation("email address is not valid".into()));
    }
    if request.display_name.trim().is_empty() {
        return Err(ApiError::Validation("display name is required".into()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// 32 lowercase hex characters (128 random bits).
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_req() -> RegisterRequest {
        RegisterRequest::new("a@x.com", "Foo", "secret")
    }

    #[tokio::test]
    async fn test_register_then_login_returns_registered_name() {
        let api = InMemoryApi::new();
        api.register(&register_req()).await.unwrap();

        let resp = api.login(&register_req().to_login()).await.unwrap();

        assert_eq!(resp.display_name, "Foo");
        assert_eq!(resp.token.len(), 32);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_returns_conflict() {
        let api = InMemoryApi::new();
        api.register(&register_req()).await.unwrap();

        let again = RegisterRequest::new(" A@X.com ", "Bar", "another1");
        let result = api.register(&again).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_bad_input_returns_validation() {
        let api = InMemoryApi::new();
        for req in [
            RegisterRequest::new("not-an-email", "Foo", "secret"),
            RegisterRequest::new("a@x.com", "  ", "secret"),
            RegisterRequest::new("a@x.com", "Foo", "123"),
        ] {
            let result = api.register(&req).await;
            assert!(matches!(result, Err(ApiError::Validation(_))), "{req:?}");
        }
    }

    #[tokio::test]
    async fn test_login_wrong_password_returns_auth() {
        let api = InMemoryApi::new();
        api.register(&register_req()).await.unwrap();

        let result = api.login(&LoginRequest::new("a@x.com", "wrong!")).await;

        assert!(matches!(result, Err(ApiError::Auth(_))));
    }

    #[tokio::test]
    async fn test_player_status_not_found_until_record_exists() {
        let api = InMemoryApi::new();
        api.register(&register_req()).await.unwrap();
        let resp = api.login(&register_req().to_login()).await.unwrap();
        let token = Credential::new(resp.token).unwrap();

        assert!(matches!(
            api.player_status(&token).await,
            Err(ApiError::NotFound(_))
        ));

        assert!(api.open_player_record(&token));
        assert!(!api.player_status(&token).await.unwrap().character_created);

        assert!(api.create_character(&token));
        assert!(api.player_status(&token).await.unwrap().character_created);
    }

    #[tokio::test]
    async fn test_scripted_failure_is_used_once() {
        let api = InMemoryApi::new();
        api.register(&register_req()).await.unwrap();
        api.fail_next_login(ApiError::Timeout);

        assert_eq!(
            api.login(&register_req().to_login()).await,
            Err(ApiError::Timeout)
        );
        assert!(api.login(&register_req().to_login()).await.is_ok());
        assert_eq!(api.calls().login, 2);
    }
}
