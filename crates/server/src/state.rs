//! # Application State
//!
//! The shared resources every handler reaches: the configuration, the Foreplay
//! client, the run store, and the compiled page templates.

use crate::config::AppConfig;
use crate::runs::RunStore;
use crate::templates::build_templates;
use boardscribe::{AdSource, EnrichmentPipeline, ForeplayClient};
use handlebars::Handlebars;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: Arc<ForeplayClient>,
    pub runs: Arc<RunStore>,
    pub templates: Arc<Handlebars<'static>>,
}

impl AppState {
    /// A pipeline over `source`, paced and sized as configured.
    pub fn pipeline<'a, S: AdSource + ?Sized>(&self, source: &'a S) -> EnrichmentPipeline<'a, S> {
        EnrichmentPipeline::new(source)
            .with_page_limit(self.config.board_page_limit)
            .with_delay(Duration::from_millis(self.config.detail_delay_ms))
    }
}

/// Builds the shared application state from the configuration.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let mut builder = ForeplayClient::builder()
        .base_url(config.base_url.clone())
        .timeout_secs(config.request_timeout_secs);
    if let Some(key) = &config.api_key {
        builder = builder.api_key(key.clone());
    }
    let client = builder.build()?;
    info!(base_url = %client.base_url(), "Initialized Foreplay client.");

    let templates =
        build_templates().map_err(|e| anyhow::anyhow!("Failed to compile page templates: {e}"))?;

    Ok(AppState {
        runs: Arc::new(RunStore::new(config.max_runs)),
        config: Arc::new(config),
        client: Arc::new(client),
        templates: Arc::new(templates),
    })
}
