//! Export formats, their MIME types and file names.

use crate::ExportError;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// id, name, transcript. The default download.
    QuickCsv,
    Csv,
    SegmentsCsv,
    Xlsx,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::QuickCsv,
        ExportFormat::Csv,
        ExportFormat::SegmentsCsv,
        ExportFormat::Xlsx,
        ExportFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::QuickCsv => "quick-csv",
            ExportFormat::Csv => "csv",
            ExportFormat::SegmentsCsv => "segments-csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    /// Human-readable label for download buttons.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::QuickCsv => "Quick CSV (id, name, transcript)",
            ExportFormat::Csv => "Full CSV",
            ExportFormat::SegmentsCsv => "Timestamped segments CSV",
            ExportFormat::Xlsx => "Excel workbook",
            ExportFormat::Json => "Complete JSON",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::QuickCsv | ExportFormat::Csv | ExportFormat::SegmentsCsv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::QuickCsv | ExportFormat::Csv | ExportFormat::SegmentsCsv => {
                "text/csv; charset=utf-8"
            }
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Json => "application/json",
        }
    }

    pub fn filename(&self, board_id: &str, timestamp: &str) -> String {
        let ext = self.extension();
        match self {
            ExportFormat::QuickCsv => format!("transcripts_{board_id}_{timestamp}.{ext}"),
            ExportFormat::Csv | ExportFormat::Xlsx => {
                format!("board_{board_id}_transcripts_{timestamp}.{ext}")
            }
            ExportFormat::SegmentsCsv => format!("board_{board_id}_timestamped_{timestamp}.{ext}"),
            ExportFormat::Json => format!("board_{board_id}_complete_{timestamp}.{ext}"),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExportError::UnknownFormat(s.to_string()))
    }
}

/// Formats a moment as `YYYYmmdd_HHMMSS`.
pub fn file_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_filenames() {
        let ts = "20240102_030405";
        assert_eq!(
            ExportFormat::QuickCsv.filename("b1", ts),
            "transcripts_b1_20240102_030405.csv"
        );
        assert_eq!(
            ExportFormat::Csv.filename("b1", ts),
            "board_b1_transcripts_20240102_030405.csv"
        );
        assert_eq!(
            ExportFormat::SegmentsCsv.filename("b1", ts),
            "board_b1_timestamped_20240102_030405.csv"
        );
        assert_eq!(
            ExportFormat::Xlsx.filename("b1", ts),
            "board_b1_transcripts_20240102_030405.xlsx"
        );
        assert_eq!(
            ExportFormat::Json.filename("b1", ts),
            "board_b1_complete_20240102_030405.json"
        );
    }

    #[test]
    fn test_parse_round_trips_names() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_timestamp_shape() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(file_timestamp(&at), "20240102_030405");
    }
}
