//! Application state - the store and the policy every controller shares.

use std::sync::Arc;

use opinions_core::ports::OpinionsApi;
use opinions_core::{ClientPolicy, OpinionStore};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: OpinionStore,
    pub policy: ClientPolicy,
}

impl AppState {
    /// Build the state with the service implementation the build supports.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let api = build_api(config)?;
        tracing::info!("Application state initialized");

        Ok(Self {
            store: OpinionStore::new(api),
            policy: config.policy,
        })
    }
}

#[cfg(feature = "http")]
fn build_api(config: &AppConfig) -> anyhow::Result<Arc<dyn OpinionsApi>> {
    use anyhow::Context;
    use opinions_infra::{HttpApiConfig, HttpOpinionsApi};

    let api = HttpOpinionsApi::new(HttpApiConfig {
        base_url: config.api_url.clone(),
        timeout: config.request_timeout,
    })
    .with_context(|| format!("Failed to set up client for {}", config.api_url))?;

    tracing::info!(base_url = %api.base_url(), "Using remote opinions service");
    Ok(Arc::new(api))
}

#[cfg(not(feature = "http"))]
fn build_api(_config: &AppConfig) -> anyhow::Result<Arc<dyn OpinionsApi>> {
    tracing::warn!("Running without http feature - using in-memory opinions service");
    Ok(Arc::new(opinions_infra::InMemoryOpinionsApi::new()))
}
