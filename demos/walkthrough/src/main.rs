//! Walkthrough: one player's first two visits, start to finish.
//!
//! Runs against the in-memory game service and a scratch directory, so it
//! needs no server. Set `RUST_LOG=debug` to see every transition.
//!
//! ```text
//! cargo run -p walkthrough
//! ```

use std::sync::Arc;
use std::time::Duration;

use portico::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Client = Portico<Arc<InMemoryApi>, FileStorage>;

fn open_client(api: &Arc<InMemoryApi>, config: &ClientConfig) -> Result<Client, PorticoError> {
    PorticoBuilder::new()
        .config(config.clone())
        .build(Arc::clone(api), FileStorage::new(&config.storage_dir))
}

fn describe(snapshot: &SessionSnapshot) -> String {
    match snapshot.identity() {
        Some(identity) => format!("signed in as {} ({})", identity.display_name, identity.id),
        None if snapshot.loading => "loading".to_string(),
        None => "signed out".to_string(),
    }
}

async fn show_entry_screen(client: &Client) {
    match client.onboarding().resolve_entry_screen().await {
        Some(screen) => tracing::info!(%screen, "showing entry screen"),
        None => tracing::info!("entry screen request was superseded"),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), PorticoError> {
    portico::init_tracing();

    let mut config = ClientConfig::from_env()?;
    config.storage_dir = std::env::temp_dir().join(format!("portico-walkthrough-{}", std::process::id()));
    let api = Arc::new(InMemoryApi::with_latency(Duration::from_millis(150)));

    // Visit 1 ---------------------------------------------------------------
    {
        let client = open_client(&api, &config)?;
        let mut session = client.session().subscribe();
        client.start();
        if let Some(snapshot) = session.ready().await {
            tracing::info!(session = %describe(&snapshot), "visit 1 ready");
        }
        show_entry_screen(&client).await;

        // A typo first, then the real thing.
        client.modal().open(AuthMode::Register);
        let outcome = client
            .modal()
            .submit_register(RegisterForm::new("neo@example.com", "Neo", "123"))
            .await;
        if let SubmitOutcome::Failed(failure) = &outcome {
            tracing::info!(kind = ?failure.kind, message = %failure.message, "modal shows error");
        }
        let outcome = client
            .modal()
            .submit_register(RegisterForm::new("neo@example.com", "Neo", "wake-up"))
            .await;
        tracing::info!(?outcome, "registration finished");
        tracing::info!(session = %describe(&client.session().current()), "after registration");

        // New account, no player record: character creation.
        show_entry_screen(&client).await;

        if let Some(token) = client.session().current().credential() {
            api.create_character(token);
            tracing::info!("character created");
        }
    }

    // Visit 2 ---------------------------------------------------------------
    {
        let client = open_client(&api, &config)?;
        client.start();
        let snapshot = client.session().ready().await;
        tracing::info!(session = %describe(&snapshot), "visit 2 restored");
        show_entry_screen(&client).await;

        client.logout().await;
        tracing::info!(session = %describe(&client.session().current()), "after logout");
        show_entry_screen(&client).await;
    }

    if let Err(e) = tokio::fs::remove_dir_all(&config.storage_dir).await {
        tracing::debug!(error = %e, "could not remove scratch directory");
    }
    Ok(())
}
