//! Integration tests: the session store over real files.
//!
//! A fresh `SessionStore` over the same directory models a process
//! restart. Each test gets its own `TempDir`.

use portico_api::{Credential, Identity, UserId};
use portico_session::{SessionConfig, SessionSnapshot, SessionStore};
use portico_storage::FileStorage;
use tempfile::TempDir;

fn open(dir: &TempDir) -> SessionStore<FileStorage> {
    SessionStore::new(FileStorage::new(dir.path()), SessionConfig::default())
}

fn foo() -> (Identity, Credential) {
    (Identity::new(UserId(7), "Foo"), Credential::new("T1").unwrap())
}

#[tokio::test]
async fn test_login_survives_restart() {
    let dir = TempDir::new().unwrap();
    let (identity, credential) = foo();

    let first = open(&dir);
    first.initialize().await.unwrap();
    first.login(identity.clone(), credential).await;
    drop(first);

    let second = open(&dir);
    second.initialize().await.unwrap();

    let snap = second.current();
    assert_eq!(snap.identity(), Some(&identity));
    assert_eq!(snap.credential().unwrap().expose(), "T1");
}

#[tokio::test]
async fn test_logout_survives_restart() {
    let dir = TempDir::new().unwrap();
    let (identity, credential) = foo();

    let first = open(&dir);
    first.login(identity, credential).await;
    first.logout().await;
    drop(first);

    let second = open(&dir);
    second.initialize().await.unwrap();

    assert_eq!(second.current(), SessionSnapshot::anonymous());
    assert!(!dir.path().join("portico.session").exists());
}

#[tokio::test]
async fn test_garbage_file_is_discarded_on_restore() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("portico.session"), b"\x00\x01 not a session").unwrap();

    let store = open(&dir);
    store.initialize().await.unwrap();

    assert_eq!(store.current(), SessionSnapshot::anonymous());
    assert!(!dir.path().join("portico.session").exists());
}

#[tokio::test]
async fn test_record_file_is_plain_json() {
    let dir = TempDir::new().unwrap();
    let (identity, credential) = foo();

    let store = open(&dir);
    store.login(identity, credential).await;

    let raw = std::fs::read(dir.path().join("portico.session")).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"token": "T1", "user_id": 7, "display_name": "Foo"})
    );
}

#[tokio::test]
async fn test_unwritable_root_keeps_session_in_memory() {
    let dir = TempDir::new().unwrap();
    // A regular file where the storage directory should be.
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();
    let store = SessionStore::new(FileStorage::new(&blocker), SessionConfig::default());
    let (identity, credential) = foo();

    store.initialize().await.unwrap();
    store.login(identity.clone(), credential).await;

    assert_eq!(store.current().identity(), Some(&identity));
}
