//! Integration tests: the modal against the in-memory game service.

use std::sync::Arc;
use std::time::Duration;

use portico_api::{ApiError, InMemoryApi};
use portico_modal::{
    AuthModal, AuthMode, FailureKind, LoginForm, ModalPhase, RegisterForm, SubmitOutcome,
    SubmitStage,
};
use portico_session::{SessionConfig, SessionStore};
use portico_storage::MemoryStorage;
use proptest::prelude::*;

type Modal = AuthModal<Arc<InMemoryApi>, Arc<MemoryStorage>>;

fn setup(api: InMemoryApi) -> (Arc<InMemoryApi>, Arc<MemoryStorage>, Modal) {
    let api = Arc::new(api);
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionStore::new(Arc::clone(&storage), SessionConfig::default());
    let modal = AuthModal::new(Arc::clone(&api), session);
    (api, storage, modal)
}

#[tokio::test]
async fn test_register_then_auto_login_display_name_matches() {
    let (api, _storage, modal) = setup(InMemoryApi::new());
    modal.open(AuthMode::Register);

    let outcome = modal
        .submit_register(RegisterForm::new("new@x.com", "Neo", "secret"))
        .await;

    let SubmitOutcome::SignedIn(identity) = outcome else {
        panic!("expected sign-in, got {outcome:?}");
    };
    assert_eq!(identity.display_name, "Neo");
    assert_eq!(modal.session().current().identity(), Some(&identity));
    assert_eq!(api.calls().register, 1);
    assert_eq!(api.calls().login, 1);
    assert!(!modal.state().open);
}

#[tokio::test]
async fn test_register_success_persists_session() {
    let (_api, storage, modal) = setup(InMemoryApi::new());
    modal.open(AuthMode::Register);

    modal
        .submit_register(RegisterForm::new("new@x.com", "Neo", "secret"))
        .await;

    assert_eq!(storage.len(), 1);
}

#[tokio::test]
async fn test_register_then_login_failure_leaves_user_registered() {
    let (api, storage, modal) = setup(InMemoryApi::new());
    api.fail_next_login(ApiError::Auth("invalid email or password".into()));
    modal.open(AuthMode::Register);

    let outcome = modal
        .submit_register(RegisterForm::new("new@x.com", "Neo", "secret"))
        .await;

    assert!(
        matches!(outcome, SubmitOutcome::Failed(ref f) if f.kind == FailureKind::RegisteredNotSignedIn),
        "{outcome:?}"
    );
    assert!(!modal.session().current().is_authenticated());
    assert!(storage.is_empty());

    // Manual retry with the same credentials works: the account exists.
    let retry = modal
        .submit_login(LoginForm::new("new@x.com", "secret"))
        .await;
    assert!(matches!(retry, SubmitOutcome::SignedIn(_)), "{retry:?}");
}

#[tokio::test]
async fn test_register_then_login_network_failure_is_still_partial_success() {
    let (api, _storage, modal) = setup(InMemoryApi::new());
    api.fail_next_login(ApiError::Timeout);
    modal.open(AuthMode::Register);

    let outcome = modal
        .submit_register(RegisterForm::new("new@x.com", "Neo", "secret"))
        .await;

    let SubmitOutcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(failure.kind, FailureKind::RegisteredNotSignedIn);
    assert_eq!(modal.state().mode, AuthMode::Login);
}

#[tokio::test]
async fn test_register_duplicate_email_shows_conflict() {
    let (_api, _storage, modal) = setup(InMemoryApi::new());
    modal.open(AuthMode::Register);
    modal
        .submit_register(RegisterForm::new("a@x.com", "Foo", "secret"))
        .await;
    modal.session().logout().await;
    modal.open(AuthMode::Register);

    let outcome = modal
        .submit_register(RegisterForm::new("a@x.com", "Other", "secret"))
        .await;

    let SubmitOutcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(failure.kind, FailureKind::RegistrationRejected);
    assert!(!modal.session().current().is_authenticated());
}

#[tokio::test]
async fn test_login_network_error_surfaces_generic_message() {
    let (api, _storage, modal) = setup(InMemoryApi::new());
    api.fail_next_login(ApiError::Network("connection refused".into()));
    modal.open(AuthMode::Login);

    let outcome = modal.submit_login(LoginForm::new("a@x.com", "secret")).await;

    let SubmitOutcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(failure.kind, FailureKind::LoginRejected);
    assert!(!failure.message.contains("refused"), "details stay in the log");
    assert!(modal.state().open);
}

#[tokio::test(start_paused = true)]
async fn test_second_submit_while_submitting_is_ignored() {
    let (api, _storage, modal) = setup(InMemoryApi::with_latency(Duration::from_millis(200)));
    modal.open(AuthMode::Register);

    let (first, second) = tokio::join!(
        modal.submit_register(RegisterForm::new("a@x.com", "Foo", "secret")),
        modal.submit_register(RegisterForm::new("b@x.com", "Bar", "secret")),
    );

    assert!(matches!(first, SubmitOutcome::SignedIn(_)), "{first:?}");
    assert_eq!(second, SubmitOutcome::Ignored);
    assert_eq!(api.calls().register, 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_during_login_drops_late_response() {
    let (api, _storage, modal) = setup(InMemoryApi::with_latency(Duration::from_millis(200)));
    modal.open(AuthMode::Register);
    modal
        .submit_register(RegisterForm::new("a@x.com", "Foo", "secret"))
        .await;
    modal.session().logout().await;
    modal.open(AuthMode::Login);

    let submit = modal.submit_login(LoginForm::new("a@x.com", "secret"));
    let close = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        modal.close();
    };
    let (outcome, ()) = tokio::join!(submit, close);

    assert_eq!(outcome, SubmitOutcome::Cancelled);
    assert!(!modal.session().current().is_authenticated());
    assert_eq!(modal.state().phase, ModalPhase::Idle);
    assert_eq!(api.calls().login, 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_login_unlocks_form() {
    let (api, _storage, modal) = setup(InMemoryApi::with_latency(Duration::from_secs(30)));
    modal.open(AuthMode::Register);
    modal
        .submit_register(RegisterForm::new("a@x.com", "Foo", "secret"))
        .await;
    modal.session().logout().await;
    modal.open(AuthMode::Login);

    let abandoned = tokio::time::timeout(
        Duration::from_secs(1),
        modal.submit_login(LoginForm::new("a@x.com", "secret")),
    )
    .await;
    assert!(abandoned.is_err());

    let state = modal.state();
    assert!(state.open);
    assert_eq!(state.phase, ModalPhase::Idle);
    assert!(!state.inputs_locked());

    let outcome = modal.submit_login(LoginForm::new("a@x.com", "secret")).await;
    assert!(matches!(outcome, SubmitOutcome::SignedIn(_)), "{outcome:?}");
    // The abandoned call never reached the service.
    assert_eq!(api.calls().login, 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_register_during_chained_login_unlocks_form() {
    let (api, _storage, modal) = setup(InMemoryApi::with_latency(Duration::from_millis(200)));
    modal.open(AuthMode::Register);

    // Registration takes 200ms; give up halfway through the chained login.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(300),
        modal.submit_register(RegisterForm::new("a@x.com", "Foo", "secret")),
    )
    .await;
    assert!(abandoned.is_err());

    assert_eq!(modal.state().phase, ModalPhase::Idle);
    assert!(!modal.session().current().is_authenticated());
    assert_eq!(api.calls().register, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_success_is_never_seen_before_session() {
    let (_api, _storage, modal) = setup(InMemoryApi::new());
    modal.open(AuthMode::Register);
    let mut rx = modal.subscribe();
    let session = modal.session().clone();

    let watcher = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            if rx.borrow_and_update().phase == ModalPhase::Success {
                return session.current().is_authenticated();
            }
        }
        false
    });
    modal
        .submit_register(RegisterForm::new("a@x.com", "Foo", "secret"))
        .await;

    assert!(watcher.await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_switch_mode_during_register_cancels_chain() {
    let (api, _storage, modal) = setup(InMemoryApi::with_latency(Duration::from_millis(200)));
    modal.open(AuthMode::Register);

    let submit = modal.submit_register(RegisterForm::new("a@x.com", "Foo", "secret"));
    let switch = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        modal.switch_mode(AuthMode::Login);
    };
    let (outcome, ()) = tokio::join!(submit, switch);

    assert_eq!(outcome, SubmitOutcome::Cancelled);
    assert_eq!(api.calls().login, 0, "chained login never started");
    assert!(!modal.session().current().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_both_register_stages() {
    let (_api, _storage, modal) = setup(InMemoryApi::with_latency(Duration::from_millis(100)));
    modal.open(AuthMode::Register);
    let mut rx = modal.subscribe();

    let submit = modal.submit_register(RegisterForm::new("a@x.com", "Foo", "secret"));
    let watch = async {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let phase = rx.borrow_and_update().phase.clone();
            let done = phase == ModalPhase::Success;
            seen.push(phase);
            if done {
                break;
            }
        }
        seen
    };
    let (_, seen) = tokio::join!(submit, watch);

    assert_eq!(
        seen,
        vec![
            ModalPhase::Submitting(SubmitStage::Registering),
            ModalPhase::Submitting(SubmitStage::SigningInAfterRegister),
            ModalPhase::Success,
        ]
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_register_then_auto_login_holds_for_any_valid_input(
        email in "[a-z0-9._]{1,12}@[a-z]{1,10}\\.[a-z]{2,6}",
        display_name in "[A-Za-z][A-Za-z0-9 _-]{0,14}[A-Za-z0-9]",
        password in "[!-~][ -~]{5,23}",
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (outcome, session) = runtime.block_on(async {
            let (_api, _storage, modal) = setup(InMemoryApi::new());
            modal.open(AuthMode::Register);
            let outcome = modal
                .submit_register(RegisterForm::new(&email, &display_name, &password))
                .await;
            (outcome, modal.session().current())
        });

        let SubmitOutcome::SignedIn(identity) = outcome else {
            panic!("expected sign-in, got {outcome:?}");
        };
        prop_assert_eq!(&identity.display_name, &display_name);
        prop_assert_eq!(session.identity(), Some(&identity));
    }
}
