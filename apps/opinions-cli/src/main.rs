//! # Opinions CLI
//!
//! Terminal front-end for the opinions feed: lists opinions, shares new
//! ones and votes with optimistic counts.

mod config;
mod render;
mod session;
mod state;
mod telemetry;

use opinions_core::OpinionStore;

use config::AppConfig;
use session::Session;
use state::AppState;
use telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(api_url = %config.api_url, policy = ?config.policy, "Starting opinions client");

    let state = AppState::new(&config)?;
    spawn_feed_logger(&state.store);

    // Initial load; failures keep the empty feed.
    state.store.load().await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    Session::new(state).run(stdin, tokio::io::stdout()).await?;

    tracing::info!("Bye");
    Ok(())
}

/// Log every snapshot the store publishes.
fn spawn_feed_logger(store: &OpinionStore) {
    let mut updates = store.subscribe();

    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let (count, revision) = {
                let snapshot = updates.borrow_and_update();
                (snapshot.len(), snapshot.revision)
            };
            tracing::debug!(count, revision, "Feed updated");
        }
    });
}
