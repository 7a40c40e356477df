//! # JSON API
//!
//! Small endpoints behind the dashboard scripts: board id validation, usage,
//! run data, and export previews.

use super::{find_run, AppState};
use crate::errors::AppError;
use crate::types::{
    BoardIdPreview, BoardIdQuery, ExportPreview, PreviewQuery, RunSummary, UsageResponse,
    PREVIEW_ROWS,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use boardscribe::{catalog, extract_board_id, OperationInfo};
use boardscribe_export::{file_timestamp, flat_table, quick_table, segment_table, ExportFormat};
use chrono::Local;
use tracing::info;

/// Validates a pasted board URL and reports the id it resolves to.
pub async fn board_id_preview(Query(query): Query<BoardIdQuery>) -> Json<BoardIdPreview> {
    let board_id = extract_board_id(&query.url);
    let message = match &board_id {
        Some(id) => format!("Board ID detected: {id}"),
        None => "Invalid URL. Paste a Foreplay board URL or a board id.".to_string(),
    };
    Json(BoardIdPreview {
        input: query.url,
        valid: board_id.is_some(),
        board_id,
        message,
    })
}

/// Calls the service's usage endpoint, which does not consume credits.
pub async fn usage(State(app_state): State<AppState>) -> Result<Json<UsageResponse>, AppError> {
    let usage = app_state.client.usage().await?;
    info!("Fetched Foreplay usage");
    Ok(Json(UsageResponse {
        usage,
        credits_remaining: app_state.client.credits_remaining(),
    }))
}

/// The operations the client knows about.
pub async fn endpoints() -> Json<Vec<OperationInfo>> {
    Json(catalog())
}

/// A stored run with every enriched ad.
pub async fn run_json(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunSummary>, AppError> {
    let run = find_run(&app_state, &id)?;
    Ok(Json(RunSummary::from(run.as_ref())))
}

/// The first rows of a tabular export plus its overall size. Defaults to the quick CSV.
pub async fn export_preview(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<ExportPreview>, AppError> {
    let run = find_run(&app_state, &id)?;
    let format = query.format.unwrap_or(ExportFormat::QuickCsv);
    let records = run.report.records();
    let table = match format {
        ExportFormat::QuickCsv => quick_table(&records),
        ExportFormat::Csv => flat_table(&records),
        ExportFormat::SegmentsCsv => segment_table(&records),
        ExportFormat::Xlsx | ExportFormat::Json => {
            return Err(AppError::BadRequest(format!(
                "No table preview for the {format} format"
            )))
        }
    };
    Ok(Json(ExportPreview {
        format,
        filename: format.filename(run.board_id(), &file_timestamp(&Local::now())),
        table: table.preview(PREVIEW_ROWS),
    }))
}
