//! Integration tests for the Portico client: every layer wired together,
//! running against the in-memory game service and real files.

use std::sync::Arc;

use portico::prelude::*;
use portico_api::InMemoryApi;
use tempfile::TempDir;

// =========================================================================
// Helpers
// =========================================================================

type Client = Portico<Arc<InMemoryApi>, FileStorage>;

fn client(api: &Arc<InMemoryApi>, dir: &TempDir) -> Client {
    PorticoBuilder::new()
        .build(Arc::clone(api), FileStorage::new(dir.path()))
        .expect("default config is valid")
}

async fn register(client: &Client, email: &str, name: &str) -> Identity {
    client.modal().open(AuthMode::Register);
    match client
        .modal()
        .submit_register(RegisterForm::new(email, name, "secret"))
        .await
    {
        SubmitOutcome::SignedIn(identity) => identity,
        other => panic!("registration failed: {other:?}"),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_first_visit_lands_on_landing() {
    let api = Arc::new(InMemoryApi::new());
    let dir = TempDir::new().unwrap();
    let client = client(&api, &dir);

    client.start();

    assert_eq!(
        client.onboarding().resolve_entry_screen().await,
        Some(EntryScreen::Landing)
    );
}

#[tokio::test]
async fn test_full_journey_register_create_character_reload_play() {
    let api = Arc::new(InMemoryApi::new());
    let dir = TempDir::new().unwrap();

    // Visit 1: register, no character yet.
    let first = client(&api, &dir);
    first.start().await.unwrap();
    let identity = register(&first, "neo@x.com", "Neo").await;
    assert_eq!(identity.display_name, "Neo");
    assert_eq!(
        first.onboarding().resolve_entry_screen().await,
        Some(EntryScreen::CreateCharacter)
    );
    assert_eq!(
        first.onboarding().decision().unwrap().reason,
        OnboardingReason::NoPlayerRecord
    );

    // The game creates the character out of band.
    let token = first.session().current().credential().cloned().unwrap();
    api.create_character(&token);
    drop(first);

    // Visit 2: a fresh client over the same storage picks the session up.
    let second = client(&api, &dir);
    second.start();
    let snap = second.session().ready().await;
    assert_eq!(snap.identity(), Some(&identity));
    assert_eq!(
        second.onboarding().resolve_entry_screen().await,
        Some(EntryScreen::Game)
    );
}

#[tokio::test]
async fn test_logout_clears_everything_and_next_visit_is_anonymous() {
    let api = Arc::new(InMemoryApi::new());
    let dir = TempDir::new().unwrap();

    let first = client(&api, &dir);
    first.start().await.unwrap();
    register(&first, "neo@x.com", "Neo").await;
    first.onboarding().resolve_entry_screen().await;
    first.logout().await;

    assert!(first.session().current().is_anonymous());
    assert!(!first.modal().state().open);
    drop(first);

    let second = client(&api, &dir);
    second.start().await.unwrap();
    assert_eq!(
        second.onboarding().resolve_entry_screen().await,
        Some(EntryScreen::Landing)
    );
}

#[tokio::test]
async fn test_logout_withdraws_game_decision_from_subscribers() {
    let api = Arc::new(InMemoryApi::new());
    let dir = TempDir::new().unwrap();
    let client = client(&api, &dir);
    client.start().await.unwrap();
    register(&client, "neo@x.com", "Neo").await;
    let token = client.session().current().credential().cloned().unwrap();
    api.create_character(&token);
    assert_eq!(
        client.onboarding().resolve_entry_screen().await,
        Some(EntryScreen::Game)
    );
    let decisions = client.onboarding().subscribe();

    client.logout().await;

    assert!(decisions.borrow().is_none());
    assert_eq!(
        client.onboarding().resolve_entry_screen().await,
        Some(EntryScreen::Landing)
    );
    assert_eq!(
        client.onboarding().decision().unwrap().reason,
        OnboardingReason::Anonymous
    );
}

#[tokio::test]
async fn test_status_outage_still_routes_to_character_creation() {
    let api = Arc::new(InMemoryApi::new());
    let dir = TempDir::new().unwrap();
    let client = client(&api, &dir);
    client.start().await.unwrap();
    register(&client, "neo@x.com", "Neo").await;
    api.fail_next_status(ApiError::Network("503 Service Unavailable".into()));

    assert_eq!(
        client.onboarding().resolve_entry_screen().await,
        Some(EntryScreen::CreateCharacter)
    );
    assert_eq!(
        client.onboarding().decision().unwrap().reason,
        OnboardingReason::StatusUnavailable
    );
}

#[tokio::test]
async fn test_session_subscribers_see_login_from_modal() {
    let api = Arc::new(InMemoryApi::new());
    let dir = TempDir::new().unwrap();
    let client = client(&api, &dir);
    client.start().await.unwrap();
    let mut sub = client.session().subscribe();
    sub.snapshot();

    let identity = register(&client, "neo@x.com", "Neo").await;

    let snap = sub.changed().await.unwrap();
    assert_eq!(snap.identity(), Some(&identity));
}

#[tokio::test]
async fn test_build_rejects_invalid_config() {
    let config = ClientConfig {
        storage_key: "../escape".into(),
        ..ClientConfig::default()
    };

    let result = PorticoBuilder::new()
        .config(config)
        .build(InMemoryApi::new(), MemoryStorage::new());

    assert!(matches!(result, Err(PorticoError::Config(_))));
}

#[tokio::test]
async fn test_custom_storage_key_is_respected() {
    let api = Arc::new(InMemoryApi::new());
    let dir = TempDir::new().unwrap();
    let config = ClientConfig {
        storage_key: "profile-2.session".into(),
        ..ClientConfig::default()
    };
    let client = PorticoBuilder::new()
        .config(config)
        .build(Arc::clone(&api), FileStorage::new(dir.path()))
        .unwrap();
    client.start().await.unwrap();

    register(&client, "neo@x.com", "Neo").await;

    assert!(dir.path().join("profile-2.session").exists());
    assert!(!dir.path().join("portico.session").exists());
}
