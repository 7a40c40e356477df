//! # Client Configuration
//!
//! Settings for [`crate::ForeplayClient`], loadable from the process
//! environment (and a `.env` file, via `dotenvy`).

use crate::constants::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TIMEOUT_ENV,
};

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// The bearer token. A missing key is only reported when a request is made.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Reads `FOREPLAY_API_KEY`, `FOREPLAY_BASE_URL` and `FOREPLAY_TIMEOUT_SECS`.
    ///
    /// Empty values count as unset. An unparsable timeout falls back to the default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_empty(API_KEY_ENV),
            base_url: non_empty(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: non_empty(TIMEOUT_ENV)
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
