//! # Table Projections
//!
//! The three tabular shapes of a run: the flat table (one row per ad), the
//! quick table (id, name, transcript), and the segment table (one row per
//! timestamped sentence).

use boardscribe::AdRecord;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const FLAT_COLUMNS: [&str; 13] = [
    "ad_id",
    "name",
    "brand_id",
    "description",
    "headline",
    "full_transcription",
    "timestamped_transcription",
    "video_duration_seconds",
    "display_format",
    "publisher_platform",
    "live",
    "video_url",
    "link_url",
];

pub const QUICK_COLUMNS: [&str; 3] = ["ad_id", "name", "full_transcription"];

pub const SEGMENT_COLUMNS: [&str; 5] = ["ad_id", "name", "start_time", "end_time", "sentence"];

/// A single table value. Numbers and booleans stay typed so the workbook
/// writer can store them as native cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // Whole numbers keep one decimal, as in a float column: `1.0`, not `1`.
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.1}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Characters across every data cell, headers excluded.
    pub fn total_chars(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .map(|cell| cell.to_string().chars().count())
            .sum()
    }

    /// The first `n` rows rendered as strings.
    pub fn preview(&self, n: usize) -> TablePreview {
        TablePreview {
            headers: self.headers.iter().map(|h| h.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .take(n)
                .map(|row| row.iter().map(Cell::to_string).collect())
                .collect(),
            row_count: self.len(),
            column_count: self.column_count(),
            total_chars: self.total_chars(),
        }
    }
}

/// A truncated view of a table plus its overall size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
    pub column_count: usize,
    pub total_chars: usize,
}

/// One row per ad with every exported field.
pub fn flat_table(records: &[AdRecord]) -> Table {
    let mut table = Table::new(&FLAT_COLUMNS);
    for ad in records {
        table.push_row(vec![
            ad.ad_id().into(),
            ad.name().into(),
            ad.brand_id().into(),
            ad.description_text().into(),
            ad.headline().into(),
            ad.full_transcription().into(),
            segments_json(ad).into(),
            ad.video_duration().into(),
            ad.display_format().into(),
            ad.publisher_platforms().join(", ").into(),
            ad.live().into(),
            ad.video_url().into(),
            ad.link_url().into(),
        ]);
    }
    table
}

/// The default export: id, name and transcript.
pub fn quick_table(records: &[AdRecord]) -> Table {
    let mut table = Table::new(&QUICK_COLUMNS);
    for ad in records {
        table.push_row(vec![
            ad.ad_id().into(),
            ad.name().into(),
            ad.full_transcription().into(),
        ]);
    }
    table
}

/// One row per transcript segment. Ads without segments contribute nothing.
pub fn segment_table(records: &[AdRecord]) -> Table {
    let mut table = Table::new(&SEGMENT_COLUMNS);
    for ad in records {
        for segment in ad.segments() {
            table.push_row(vec![
                ad.ad_id().into(),
                ad.name().into(),
                segment.start_time.into(),
                segment.end_time.into(),
                segment.sentence.trim().into(),
            ]);
        }
    }
    table
}

/// The raw segment array as compact JSON, `[]` when absent.
fn segments_json(ad: &AdRecord) -> String {
    serde_json::to_string(&Value::Array(ad.raw_segments())).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ad(value: Value) -> AdRecord {
        AdRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_flat_table_of_nothing_has_only_headers() {
        let table = flat_table(&[]);
        assert_eq!(table.headers, FLAT_COLUMNS.to_vec());
        assert!(table.is_empty());
    }

    #[test]
    fn test_flat_row_normalizes_fields() {
        let record = ad(json!({
            "ad_id": "a1",
            "name": "Spring",
            "description": "line one<br />line two",
            "publisher_platform": ["facebook", "instagram"],
            "live": true,
            "video_duration": 31.5,
            "timestamped_transcription": null,
            "video": "https://cdn/a1.mp4"
        }));
        let table = flat_table(&[record]);
        let row = &table.rows[0];

        assert_eq!(row[3], Cell::Text("line one\nline two".to_string()));
        assert_eq!(row[6], Cell::Text("[]".to_string()));
        assert_eq!(row[7], Cell::Number(31.5));
        assert_eq!(row[9].to_string(), "facebook, instagram");
        assert_eq!(row[10].to_string(), "True");
        assert_eq!(row[11].to_string(), "https://cdn/a1.mp4");
    }

    #[test]
    fn test_segment_table_skips_ads_without_segments() {
        let records = vec![
            ad(json!({"ad_id": "a1", "name": "none", "timestamped_transcription": []})),
            ad(json!({
                "ad_id": "a2",
                "name": "two",
                "timestamped_transcription": [
                    {"startTime": 0, "endTime": 1.25, "sentence": "  first  "},
                    {"startTime": 1.25, "endTime": 3, "sentence": "second"}
                ]
            })),
        ];
        let table = segment_table(&records);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0].to_string(), "a2");
        assert_eq!(table.rows[0][3].to_string(), "1.25");
        assert_eq!(table.rows[0][4].to_string(), "first");
        assert_eq!(table.rows[1][2].to_string(), "1.25");
    }

    #[test]
    fn test_segment_table_keeps_segments_with_null_fields() {
        let record = ad(json!({
            "ad_id": "a1",
            "name": "gappy",
            "timestamped_transcription": [
                {"startTime": 0.0, "endTime": 1.0, "sentence": "Hook"},
                {"startTime": null, "endTime": 2.0, "sentence": "Offer"},
                {"startTime": 2.0, "endTime": 3.5, "sentence": null}
            ]
        }));
        assert_eq!(record.segment_count(), 3);

        let table = segment_table(&[record]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1][2], Cell::Number(0.0));
        assert_eq!(table.rows[1][4].to_string(), "Offer");
        assert_eq!(table.rows[2][3].to_string(), "3.5");
        assert_eq!(table.rows[2][4].to_string(), "");
    }

    #[test]
    fn test_whole_numbers_print_as_floats() {
        assert_eq!(Cell::Number(1.0).to_string(), "1.0");
        assert_eq!(Cell::Number(0.0).to_string(), "0.0");
        assert_eq!(Cell::Number(31.5).to_string(), "31.5");
    }

    #[test]
    fn test_preview_counts_whole_table() {
        let records: Vec<AdRecord> = (0..5)
            .map(|i| ad(json!({"ad_id": format!("a{i}"), "name": "n", "full_transcription": "abc"})))
            .collect();
        let preview = quick_table(&records).preview(3);

        assert_eq!(preview.rows.len(), 3);
        assert_eq!(preview.row_count, 5);
        assert_eq!(preview.column_count, 3);
        assert_eq!(preview.total_chars, 5 * (2 + 1 + 3));
    }
}
