pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod runs;
pub mod state;
pub mod templates;
pub mod types;

use crate::{
    config::{get_config, AppConfig},
    router::create_router,
    state::build_app_state,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

/// Configures and runs the dashboard server.
///
/// Builds the shared Foreplay client and run store from `config`, mounts the
/// router and serves on `listener` until shutdown.
pub async fn run(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    // Field by field, so the API key never reaches the log.
    info!(
        base_url = %config.base_url,
        api_key_set = config.api_key.is_some(),
        board_page_limit = config.board_page_limit,
        detail_delay_ms = config.detail_delay_ms,
        max_runs = config.max_runs,
        "Foreplay dashboard configured"
    );
    match &config.export_dir {
        Some(dir) => info!("Downloads are also saved to {}", dir.display()),
        None => debug!("No export_dir set; downloads are not saved locally"),
    }

    let app_state = build_app_state(config).await?;
    let app = create_router(app_state);

    info!("Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// The library's main entry point.
///
/// Sets up logging, configuration, and the TCP listener, then calls `run`.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = get_config(None)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    run(listener, config).await
}
