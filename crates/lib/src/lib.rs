//! # Boardscribe
//!
//! A client for the Foreplay advertising-intelligence API and the board
//! enrichment pipeline built on it: list a board's ads, keep the videos, and
//! pull each one's transcript through the detail endpoint.

pub mod board;
pub mod client;
pub mod config;
pub mod constants;
pub mod endpoints;
pub mod errors;
pub mod params;
pub mod pipeline;
pub mod types;

pub use board::extract_board_id;
pub use client::{ForeplayClient, ForeplayClientBuilder};
pub use config::ClientConfig;
pub use endpoints::{catalog, Endpoint, OperationInfo};
pub use errors::{ClientError, PipelineError};
pub use params::{AdFilters, FilterProfile, Page, QueryParams, QueryValue};
pub use pipeline::{
    filter_video_ads, AdSource, DetailStatus, EnrichedAd, EnrichmentPipeline, EnrichmentReport,
    PipelineStage,
};
pub use types::{AdRecord, TranscriptSegment};
