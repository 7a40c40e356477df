//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port, pointed at a mock
//! Foreplay API, with an isolated export directory.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use boardscribe_server::{config::AppConfig, router::create_router, state::build_app_state, state::AppState};
use boardscribe_test_utils::{MockForeplay, TEST_API_KEY};
use reqwest::{Client, Response};
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock: MockForeplay,
    pub state: AppState,
    pub export_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Like [`TestApp::spawn`], letting the caller adjust the configuration first.
    pub async fn spawn_with(adjust: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        // `try_init` is used to prevent panic if the logger is already initialized.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock = MockForeplay::start().await;
        let export_dir = tempfile::tempdir()?;
        let mut config = AppConfig {
            base_url: mock.uri(),
            api_key: Some(TEST_API_KEY.to_string()),
            detail_delay_ms: 0,
            export_dir: Some(export_dir.path().to_path_buf()),
            ..Default::default()
        };
        adjust(&mut config);
        let state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let app = create_router(state.clone());
        let server_handle = tokio::spawn(async move {
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        // Give the server a moment to start up.
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock,
            state,
            export_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Submits the extraction form. Redirects are followed to the results page.
    pub async fn extract(&self, board_url: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/extract"))
            .form(&[("board_url", board_url)])
            .send()
            .await?)
    }

    /// Submits the extraction form and returns the id of the stored run.
    pub async fn extract_run_id(&self, board_url: &str) -> Result<String> {
        let response = self.extract(board_url).await?;
        anyhow::ensure!(
            response.status().is_success(),
            "extraction failed with {}",
            response.status()
        );
        response
            .url()
            .path()
            .strip_prefix("/runs/")
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("unexpected redirect to {}", response.url()))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The receiver might already be gone if the server task panicked,
            // so we ignore the result of send.
            let _ = tx.send(());
        }
    }
}
