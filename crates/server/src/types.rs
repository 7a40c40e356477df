//! Request payloads, API responses, and the view models the page templates render.

use crate::runs::BoardRun;
use boardscribe::{EnrichedAd, EnrichmentReport};
use boardscribe_export::{ExportFormat, TablePreview};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Segments shown per ad on the results page.
pub const SEGMENT_PREVIEW_LIMIT: usize = 50;
/// Rows returned by the export preview.
pub const PREVIEW_ROWS: usize = 3;

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// --- Requests ---

#[derive(Debug, Deserialize)]
pub struct ExtractForm {
    pub board_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BoardIdQuery {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct PreviewQuery {
    pub format: Option<ExportFormat>,
}

// --- API Responses ---

#[derive(Debug, Serialize)]
pub struct BoardIdPreview {
    pub input: String,
    pub board_id: Option<String>,
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub usage: Value,
    pub credits_remaining: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub id: String,
    pub board_id: String,
    pub input: String,
    pub created_at: String,
    pub listed: usize,
    pub video_ads: usize,
    pub failed: usize,
    pub with_transcript: usize,
    pub total_duration_seconds: f64,
    pub total_segments: usize,
    pub ads: Vec<EnrichedAd>,
}

impl From<&BoardRun> for RunSummary {
    fn from(run: &BoardRun) -> Self {
        let report = &run.report;
        Self {
            id: run.id.to_string(),
            board_id: report.board_id.clone(),
            input: run.input.clone(),
            created_at: run.created_at.to_rfc3339(),
            listed: report.listed,
            video_ads: report.len(),
            failed: report.failed_count(),
            with_transcript: report.with_transcript(),
            total_duration_seconds: report.total_duration(),
            total_segments: report.total_segments(),
            ads: report.ads.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportPreview {
    pub format: ExportFormat,
    pub filename: String,
    #[serde(flatten)]
    pub table: TablePreview,
}

// --- Page View Models ---

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub credits_remaining: Option<String>,
    pub recent: Vec<RunLink>,
}

#[derive(Debug, Serialize)]
pub struct RunLink {
    pub id: String,
    pub board_id: String,
    pub created_at: String,
    pub video_ads: usize,
    pub failed: usize,
}

impl From<&BoardRun> for RunLink {
    fn from(run: &BoardRun) -> Self {
        Self {
            id: run.id.to_string(),
            board_id: run.board_id().to_string(),
            created_at: run.created_at.format(DISPLAY_TIME_FORMAT).to_string(),
            video_ads: run.report.len(),
            failed: run.report.failed_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunPage {
    pub id: String,
    pub board_id: String,
    pub input: String,
    pub created_at: String,
    pub listed: usize,
    pub metrics: Metrics,
    pub ads: Vec<AdCard>,
    pub failures: Vec<FailureNote>,
    pub failure_count: usize,
    pub exports: Vec<ExportLink>,
    pub credits_remaining: Option<String>,
}

impl RunPage {
    pub fn new(run: &BoardRun, credits_remaining: Option<String>) -> Self {
        let report = &run.report;
        let id = run.id.to_string();
        Self {
            exports: ExportFormat::ALL
                .iter()
                .map(|format| ExportLink {
                    href: format!("/runs/{id}/export/{format}"),
                    label: format.label(),
                })
                .collect(),
            id,
            board_id: report.board_id.clone(),
            input: run.input.clone(),
            created_at: run.created_at.format(DISPLAY_TIME_FORMAT).to_string(),
            listed: report.listed,
            metrics: Metrics::from(report),
            ads: report
                .ads
                .iter()
                .enumerate()
                .map(|(i, ad)| AdCard::new(i + 1, ad))
                .collect(),
            failures: report
                .failures()
                .map(|ad| FailureNote {
                    ad_id: ad.record.ad_id().to_string(),
                    name: ad.record.name().to_string(),
                    error: ad.error().unwrap_or_default().to_string(),
                })
                .collect(),
            failure_count: report.failed_count(),
            credits_remaining,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Metrics {
    pub video_ads: usize,
    pub with_transcript: usize,
    pub total_duration: String,
    pub total_segments: usize,
}

impl From<&EnrichmentReport> for Metrics {
    fn from(report: &EnrichmentReport) -> Self {
        Self {
            video_ads: report.len(),
            with_transcript: report.with_transcript(),
            total_duration: format!("{:.0}s", report.total_duration()),
            total_segments: report.total_segments(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdCard {
    pub number: usize,
    pub ad_id: String,
    pub name: String,
    pub brand_name: Option<String>,
    pub duration: String,
    pub headline: String,
    pub video_url: Option<String>,
    pub thumbnail: Option<String>,
    pub description: String,
    pub transcript: String,
    pub transcript_chars: usize,
    pub transcript_words: usize,
    pub segments: Vec<SegmentLine>,
    pub more_segments: usize,
    pub failed: Option<String>,
}

impl AdCard {
    pub fn new(number: usize, ad: &EnrichedAd) -> Self {
        let record = &ad.record;
        let transcript = record.full_transcription();
        let segments = record.segments();
        let more_segments = segments.len().saturating_sub(SEGMENT_PREVIEW_LIMIT);
        Self {
            number,
            ad_id: record.ad_id().to_string(),
            name: record.name().to_string(),
            brand_name: record.brand_name().map(str::to_string),
            duration: format!("{:.1}", record.video_duration()),
            headline: record.headline().to_string(),
            video_url: web_url(record.video_url()),
            thumbnail: record.thumbnail().and_then(web_url),
            description: record.description_text(),
            transcript: transcript.to_string(),
            transcript_chars: transcript.chars().count(),
            transcript_words: transcript.split_whitespace().count(),
            segments: segments
                .into_iter()
                .take(SEGMENT_PREVIEW_LIMIT)
                .map(|s| SegmentLine {
                    start: format!("{:.2}", s.start_time),
                    end: format!("{:.2}", s.end_time),
                    sentence: s.sentence.trim().to_string(),
                })
                .collect(),
            more_segments,
            failed: ad.error().map(str::to_string),
        }
    }
}

/// Keeps a link only when it is an `http` or `https` URL.
///
/// The page places these in `href` and `src` attributes, where escaping alone
/// does not stop a `javascript:` or `data:` URL.
fn web_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    let scheme = url.split_once(':').map(|(scheme, _)| scheme.to_ascii_lowercase())?;
    matches!(scheme.as_str(), "http" | "https").then(|| url.to_string())
}

#[derive(Debug, Serialize)]
pub struct SegmentLine {
    pub start: String,
    pub end: String,
    pub sentence: String,
}

#[derive(Debug, Serialize)]
pub struct FailureNote {
    pub ad_id: String,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ExportLink {
    pub href: String,
    pub label: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardscribe::{AdRecord, DetailStatus};
    use serde_json::json;

    fn card(value: Value) -> AdCard {
        let ad = EnrichedAd {
            record: AdRecord::from_value(value).unwrap_or_default(),
            detail: DetailStatus::Merged,
        };
        AdCard::new(1, &ad)
    }

    #[test]
    fn test_web_url_accepts_only_http_schemes() {
        assert_eq!(web_url("https://cdn/a.mp4").as_deref(), Some("https://cdn/a.mp4"));
        assert_eq!(web_url(" HTTP://cdn/a.mp4 ").as_deref(), Some("HTTP://cdn/a.mp4"));
        assert_eq!(web_url("javascript:alert(1)"), None);
        assert_eq!(web_url("JavaScript:alert(1)"), None);
        assert_eq!(web_url("data:text/html,hi"), None);
        assert_eq!(web_url("//cdn/a.mp4"), None);
        assert_eq!(web_url(""), None);
    }

    #[test]
    fn test_card_drops_unsafe_media_links() {
        let unsafe_card = card(json!({
            "ad_id": "a1",
            "video": "javascript:alert(1)",
            "thumbnail": "data:image/svg+xml,<svg/>"
        }));
        assert_eq!(unsafe_card.video_url, None);
        assert_eq!(unsafe_card.thumbnail, None);

        let safe_card = card(json!({
            "ad_id": "a2",
            "video": "https://cdn/a2.mp4",
            "thumbnail": "https://cdn/a2.jpg"
        }));
        assert_eq!(safe_card.video_url.as_deref(), Some("https://cdn/a2.mp4"));
        assert_eq!(safe_card.thumbnail.as_deref(), Some("https://cdn/a2.jpg"));
    }
}
