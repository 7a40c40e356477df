use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use boardscribe::{ClientError, PipelineError};
use boardscribe_export::ExportError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// Rendered as a JSON `{"error": ...}` body. Dashboard pages wrap it in
/// [`PageError`] to get an HTML page instead.
#[derive(Debug)]
pub enum AppError {
    /// A call to the Foreplay API failed.
    Client(ClientError),
    /// The board listing failed, so no run was produced.
    Pipeline(PipelineError),
    Export(ExportError),
    NotFound(String),
    BadRequest(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::Client(err)
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Pipeline(err)
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(err: handlebars::RenderError) -> Self {
        AppError::Internal(anyhow::anyhow!("Template rendering failed: {err}"))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl AppError {
    /// Logs the error and returns the status and the message safe to show a user.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Client(err) => {
                error!("Foreplay API error: {err:?}");
                let status = match err {
                    ClientError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string())
            }
            AppError::Pipeline(err) => {
                error!("Pipeline error: {err:?}");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            AppError::Export(err) => {
                error!("Export error: {err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::NotFound(msg) => {
                warn!("Not found: {msg}");
                (StatusCode::NOT_FOUND, msg.clone())
            }
            AppError::BadRequest(msg) => {
                warn!("Bad request: {msg}");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}

/// An [`AppError`] raised by a dashboard page, rendered as HTML.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl<E> From<E> for PageError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        PageError(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status_code, message) = self.0.status_and_message();
        let page = format!(
            "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>Boardscribe: {status}</title></head>\
             <body><main class=\"error\"><h1>{status}</h1><p>{message}</p>\
             <p><a href=\"/\">Back to the dashboard</a></p></main></body></html>",
            status = status_code,
            message = handlebars::html_escape(&message),
        );
        (status_code, Html(page)).into_response()
    }
}
