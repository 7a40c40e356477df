//! # Enrichment Pipeline
//!
//! Turns a board identifier into the board's video ads with their full detail
//! (transcripts included):
//!
//! 1. **Listing**: one `api/board/ads` call with a large page size. Only that
//!    single page is used.
//! 2. **Filtering**: keep ads whose `display_format` is `video`, in listing order.
//! 3. **DetailFetching**: one `api/ad/{id}` call per ad, sequentially, with a
//!    fixed pause between calls. Detail fields are merged over the summary.
//!    A failed call is recorded on that ad and the run moves on.
//! 4. **Done**: every filtered ad is returned, merged or summary-only.

use crate::client::{board_listing_page, detail_fields, listing_records, ForeplayClient};
use crate::constants::{BOARD_PAGE_LIMIT, DETAIL_FETCH_DELAY_MS};
use crate::errors::{ClientError, PipelineError};
use crate::params::AdFilters;
use crate::types::AdRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{info, warn};

/// The two remote reads the pipeline needs.
#[async_trait]
pub trait AdSource: Send + Sync {
    /// Lists one page of a board's ads.
    async fn list_board_ads(&self, board_id: &str, limit: u32) -> Result<Vec<AdRecord>, ClientError>;

    /// Fetches the detail fields of one ad.
    async fn ad_detail(&self, ad_id: &str) -> Result<Map<String, Value>, ClientError>;
}

#[async_trait]
impl AdSource for ForeplayClient {
    async fn list_board_ads(&self, board_id: &str, limit: u32) -> Result<Vec<AdRecord>, ClientError> {
        let page = board_listing_page().with_limit(limit);
        let response = self.board_ads(board_id, AdFilters::default(), page).await?;
        listing_records(response)
    }

    async fn ad_detail(&self, ad_id: &str) -> Result<Map<String, Value>, ClientError> {
        let response = self.ad_by_id(ad_id).await?;
        detail_fields(response)
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Listing { board_id: String },
    Filtering { listed: usize },
    DetailFetching { index: usize, total: usize, name: String },
    Done { fetched: usize, failed: usize },
}

/// How the detail half of an ad's merge went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetailStatus {
    Merged,
    /// The detail call failed; the record carries listing fields only.
    Failed { error: String },
}

/// One video ad at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedAd {
    pub record: AdRecord,
    pub detail: DetailStatus,
}

impl EnrichedAd {
    pub fn is_merged(&self) -> bool {
        matches!(self.detail, DetailStatus::Merged)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.detail {
            DetailStatus::Failed { error } => Some(error),
            DetailStatus::Merged => None,
        }
    }
}

/// The outcome of one pipeline run, in listing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentReport {
    pub board_id: String,
    /// How many ads the listing returned, of any format.
    pub listed: usize,
    pub ads: Vec<EnrichedAd>,
}

impl EnrichmentReport {
    /// True when the board held no video ads.
    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ads.len()
    }

    pub fn records(&self) -> Vec<AdRecord> {
        self.ads.iter().map(|ad| ad.record.clone()).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EnrichedAd> {
        self.ads.iter().filter(|ad| !ad.is_merged())
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn with_transcript(&self) -> usize {
        self.ads.iter().filter(|ad| ad.record.has_transcript()).count()
    }

    pub fn total_duration(&self) -> f64 {
        self.ads.iter().map(|ad| ad.record.video_duration()).sum()
    }

    pub fn total_segments(&self) -> usize {
        self.ads.iter().map(|ad| ad.record.segment_count()).sum()
    }
}

/// Keeps video ads only, preserving order.
pub fn filter_video_ads(records: Vec<AdRecord>) -> Vec<AdRecord> {
    records.into_iter().filter(AdRecord::is_video).collect()
}

/// Sequential board enrichment against any [`AdSource`].
pub struct EnrichmentPipeline<'a, S: AdSource + ?Sized> {
    source: &'a S,
    page_limit: u32,
    delay: Duration,
}

impl<'a, S: AdSource + ?Sized> EnrichmentPipeline<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            page_limit: BOARD_PAGE_LIMIT,
            delay: Duration::from_millis(DETAIL_FETCH_DELAY_MS),
        }
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    /// Pause inserted between successive detail fetches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn run(&self, board_id: &str) -> Result<EnrichmentReport, PipelineError> {
        self.run_with_progress(board_id, |_| {}).await
    }

    /// Runs the pipeline, reporting each stage transition to `progress`.
    pub async fn run_with_progress<F>(
        &self,
        board_id: &str,
        mut progress: F,
    ) -> Result<EnrichmentReport, PipelineError>
    where
        F: FnMut(&PipelineStage) + Send,
    {
        progress(&PipelineStage::Listing {
            board_id: board_id.to_string(),
        });
        info!(board_id, limit = self.page_limit, "Listing board ads");
        let listing = self
            .source
            .list_board_ads(board_id, self.page_limit)
            .await
            .map_err(|source| PipelineError::Listing {
                board_id: board_id.to_string(),
                source,
            })?;
        let listed = listing.len();

        progress(&PipelineStage::Filtering { listed });
        let videos = filter_video_ads(listing);
        let total = videos.len();
        info!(board_id, listed, videos = total, "Filtered board to video ads");

        let mut ads = Vec::with_capacity(total);
        for (i, mut record) in videos.into_iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            progress(&PipelineStage::DetailFetching {
                index: i + 1,
                total,
                name: record.name().to_string(),
            });

            let detail = match record.id().map(str::to_string) {
                Some(ad_id) => match self.source.ad_detail(&ad_id).await {
                    Ok(fields) => {
                        record.merge(fields);
                        DetailStatus::Merged
                    }
                    Err(e) => {
                        warn!(ad_id = %ad_id, error = %e, "Failed to fetch ad detail");
                        DetailStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                },
                None => {
                    warn!(position = i, "Listed ad has no identifier; skipping detail fetch");
                    DetailStatus::Failed {
                        error: "listed ad has no identifier".to_string(),
                    }
                }
            };
            ads.push(EnrichedAd { record, detail });
        }

        let report = EnrichmentReport {
            board_id: board_id.to_string(),
            listed,
            ads,
        };
        let failed = report.failed_count();
        progress(&PipelineStage::Done {
            fetched: report.len() - failed,
            failed,
        });
        info!(board_id, videos = report.len(), failed, "Enrichment finished");
        Ok(report)
    }
}
