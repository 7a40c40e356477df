//! # Route Handlers
//!
//! Split by audience: `dashboard` renders HTML pages, `export` serves
//! downloads, and `api` answers JSON for the page scripts and other callers.

pub mod api;
pub mod dashboard;
pub mod export;

pub use api::*;
pub use dashboard::*;
pub use export::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, runs::BoardRun, state::AppState};
use std::sync::Arc;
use uuid::Uuid;

/// Looks up a stored run by the id in the URL.
pub(crate) fn find_run(state: &AppState, raw_id: &str) -> Result<Arc<BoardRun>, AppError> {
    let not_found = || AppError::NotFound(format!("No run with id '{raw_id}'"));
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    state.runs.get(&id).ok_or_else(not_found)
}
