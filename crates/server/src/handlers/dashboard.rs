//! # Dashboard Pages
//!
//! The form that starts a run and the page that shows its results.

use super::{find_run, AppState};
use crate::errors::{AppError, PageError};
use crate::runs::BoardRun;
use crate::templates::{INDEX, RESULTS};
use crate::types::{ExtractForm, IndexPage, RunLink, RunPage};
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use boardscribe::{extract_board_id, PipelineStage};
use tracing::{debug, info};

const RECENT_RUNS: usize = 10;

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The landing page with the extraction form and recent runs.
pub async fn index(State(app_state): State<AppState>) -> Result<Html<String>, PageError> {
    let page = IndexPage {
        credits_remaining: app_state.client.credits_remaining(),
        recent: app_state
            .runs
            .recent(RECENT_RUNS)
            .iter()
            .map(|run| RunLink::from(run.as_ref()))
            .collect(),
    };
    Ok(Html(app_state.templates.render(INDEX, &page)?))
}

/// Runs the enrichment pipeline for the submitted board and redirects to its results.
pub async fn extract(
    State(app_state): State<AppState>,
    Form(form): Form<ExtractForm>,
) -> Result<Redirect, PageError> {
    let input = form.board_url.trim().to_string();
    let board_id = extract_board_id(&input).ok_or_else(|| {
        AppError::BadRequest(format!(
            "'{input}' is not a Foreplay board URL or board id."
        ))
    })?;
    info!(%board_id, "Starting board extraction");

    let report = app_state
        .pipeline(app_state.client.as_ref())
        .run_with_progress(&board_id, |stage| match stage {
            PipelineStage::DetailFetching { index, total, name } => {
                debug!(index, total, %name, "Fetching ad detail");
            }
            other => debug!(?other, "Pipeline stage"),
        })
        .await?;

    let run = app_state.runs.insert(BoardRun::new(input, report));
    info!(run_id = %run.id, videos = run.report.len(), "Board extraction stored");
    Ok(Redirect::to(&format!("/runs/{}", run.id)))
}

/// The results page of a stored run.
pub async fn show_run(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let run = find_run(&app_state, &id)?;
    let page = RunPage::new(&run, app_state.client.credits_remaining());
    Ok(Html(app_state.templates.render(RESULTS, &page)?))
}
