use thiserror::Error;

/// Errors raised by the Foreplay API client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API key not configured. Set the FOREPLAY_API_KEY environment variable")]
    MissingApiKey,
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the Foreplay API: {0}")]
    Request(reqwest::Error),
    #[error("Foreplay API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Failed to deserialize Foreplay API response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// The HTTP status returned by the service, if the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that abort an enrichment run.
///
/// Per-ad detail failures never surface here; they are recorded on the
/// individual [`crate::pipeline::EnrichedAd`].
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to list ads for board '{board_id}': {source}")]
    Listing {
        board_id: String,
        #[source]
        source: ClientError,
    },
}
