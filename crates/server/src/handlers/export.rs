//! Downloads of a stored run in any export format.

use super::{find_run, AppState};
use crate::errors::{AppError, PageError};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use boardscribe_export::{export, file_timestamp, ExportFormat};
use chrono::Local;
use tracing::{info, warn};

/// Serves `/runs/{id}/export/{format}` as an attachment.
///
/// When an export directory is configured the file is also saved there; a
/// failed save is logged and does not block the download.
pub async fn download_export(
    State(app_state): State<AppState>,
    Path((id, format)): Path<(String, String)>,
) -> Result<Response, PageError> {
    let run = find_run(&app_state, &id)?;
    let format: ExportFormat = format
        .parse()
        .map_err(|e: boardscribe_export::ExportError| AppError::BadRequest(e.to_string()))?;

    let file = export(
        format,
        run.board_id(),
        &run.report.records(),
        &file_timestamp(&Local::now()),
    )?;
    info!(run_id = %run.id, %format, filename = %file.filename, "Serving export");

    if let Some(dir) = &app_state.config.export_dir {
        if let Err(e) = file.save_to(dir) {
            warn!(dir = %dir.display(), error = %e, "Could not save export locally");
        }
    }

    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
