//! # `boardscribe-export`: Board Run Exports
//!
//! Renders enriched ad records as CSV (full, quick and per-segment), a
//! two-sheet XLSX workbook, or a complete JSON dump, and names the resulting
//! files after the board and the time of export.

pub mod delimited;
pub mod dump;
pub mod format;
pub mod table;
pub mod workbook;

pub use format::{file_timestamp, ExportFormat};
pub use table::{flat_table, quick_table, segment_table, Cell, Table, TablePreview};

use boardscribe::AdRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to write XLSX workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error while exporting: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown export format '{0}'")]
    UnknownFormat(String),
}

/// A rendered export, ready to be downloaded or saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// Writes the file into `dir`, creating the directory if needed.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "Saved export");
        Ok(path)
    }
}

/// Renders `records` in `format` without naming a file.
pub fn render(format: ExportFormat, records: &[AdRecord]) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::QuickCsv => delimited::to_csv(&quick_table(records)),
        ExportFormat::Csv => delimited::to_csv(&flat_table(records)),
        ExportFormat::SegmentsCsv => delimited::to_csv(&segment_table(records)),
        ExportFormat::Xlsx => workbook::to_xlsx(records),
        ExportFormat::Json => dump::to_json(records),
    }
}

/// Renders `records` and names the result after `board_id` and `timestamp`.
pub fn export(
    format: ExportFormat,
    board_id: &str,
    records: &[AdRecord],
    timestamp: &str,
) -> Result<ExportFile, ExportError> {
    let bytes = render(format, records)?;
    Ok(ExportFile {
        format,
        filename: format.filename(board_id, timestamp),
        bytes,
    })
}
