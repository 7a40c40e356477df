//! # Application Configuration
//!
//! Settings for the dashboard, layered from programmatic defaults, an optional
//! `config.yml` (with `${VAR}` substitution), plain environment variables, and
//! `BOARDSCRIBE__`-prefixed overrides.

use boardscribe::constants::{
    API_KEY_ENV, BASE_URL_ENV, BOARD_PAGE_LIMIT, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
    DETAIL_FETCH_DELAY_MS,
};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// No Foreplay API key was found in any layer.
    MissingApiKey,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::MissingApiKey => write!(
                f,
                "No Foreplay API key configured. Set {API_KEY_ENV} or `api_key` in config.yml."
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Root URL of the Foreplay API. Falls back to `FOREPLAY_BASE_URL`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for the Foreplay API. Falls back to `FOREPLAY_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Page size of the single board listing call.
    #[serde(default = "default_board_page_limit")]
    pub board_page_limit: u32,
    /// Pause between successive ad detail calls.
    #[serde(default = "default_detail_delay_ms")]
    pub detail_delay_ms: u64,
    /// How many finished runs the dashboard keeps in memory.
    #[serde(default = "default_max_runs")]
    pub max_runs: usize,
    /// When set, every download is also written here.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            board_page_limit: default_board_page_limit(),
            detail_delay_ms: default_detail_delay_ms(),
            max_runs: default_max_runs(),
            export_dir: None,
        }
    }
}

fn default_port() -> u16 {
    9090
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_board_page_limit() -> u32 {
    BOARD_PAGE_LIMIT
}

fn default_detail_delay_ms() -> u64 {
    DETAIL_FETCH_DELAY_MS
}

fn default_max_runs() -> usize {
    20
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Loads the application configuration from defaults, an optional file and the environment.
///
/// - Top-level keys such as `port` are overridden by `PORT`.
/// - Any key is overridden by `BOARDSCRIBE__<KEY>` (e.g. `BOARDSCRIBE__MAX_RUNS`).
/// - `api_key` and `base_url` fall back to `FOREPLAY_API_KEY` and `FOREPLAY_BASE_URL`.
///
/// A missing API key is an error: the dashboard cannot do anything without one.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("port", i64::from(default_port()))?
        .set_default("max_runs", default_max_runs() as i64)?;

    // Layer 2: Optional config file.
    let config_path = match config_path_override {
        Some(path) => path.to_string(),
        None => format!("{}/config.yml", env!("CARGO_MANIFEST_DIR")),
    };
    if let Some(content) = read_and_substitute(&config_path)? {
        info!("Loading configuration from '{config_path}'.");
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Layer 3: Environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Prefixed environment variables.
        .add_source(
            Environment::with_prefix("BOARDSCRIBE")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    if !config.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
        config.api_key = non_empty_env(API_KEY_ENV);
    }
    if config.base_url == DEFAULT_BASE_URL {
        if let Some(url) = non_empty_env(BASE_URL_ENV) {
            config.base_url = url;
        }
    }

    if config.api_key.is_none() {
        return Err(ConfigError::MissingApiKey);
    }
    Ok(config)
}
