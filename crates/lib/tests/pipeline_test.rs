//! # Enrichment Pipeline Tests
//!
//! Runs the board pipeline end to end against the mock Foreplay server, and
//! against an in-memory source where only call order matters.

use anyhow::Result;
use boardscribe::{DetailStatus, EnrichmentPipeline, PipelineError, PipelineStage};
use boardscribe_test_utils::{
    ad_detail, image_ad, listed_ad, video_ad, MockForeplay, ScriptedSource,
};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_board_with_mixed_formats_keeps_videos_in_order() -> Result<()> {
    // --- Arrange ---
    let mock = MockForeplay::start().await;
    mock.mount_board_ads(
        "board-1",
        vec![
            video_ad("v1", "First video"),
            image_ad("i1", "An image"),
            video_ad("v2", "Second video"),
            image_ad("i2", "Another image"),
            video_ad("v3", "Third video"),
        ],
    )
    .await;
    for id in ["v1", "v2", "v3"] {
        mock.mount_ad_detail(id, ad_detail(id, &[(0.0, 1.5, "Hook"), (1.5, 4.0, "Offer")]))
            .await;
    }
    let client = mock.client()?;

    // --- Act ---
    let report = EnrichmentPipeline::new(&client)
        .with_delay(Duration::ZERO)
        .run("board-1")
        .await?;

    // --- Assert ---
    assert_eq!(report.listed, 5);
    let ids: Vec<&str> = report.ads.iter().map(|ad| ad.record.ad_id()).collect();
    assert_eq!(ids, vec!["v1", "v2", "v3"]);
    assert!(report.ads.iter().all(|ad| ad.is_merged()));
    assert_eq!(report.ads[0].record.full_transcription(), "Hook Offer");
    assert_eq!(report.total_segments(), 6);
    // Listing fields survive the merge.
    assert_eq!(report.ads[1].record.name(), "Second video");

    let paths = mock.request_paths().await;
    assert_eq!(
        paths,
        vec!["/api/board/ads", "/api/ad/v1", "/api/ad/v2", "/api/ad/v3"]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_details_keep_summary_fields() -> Result<()> {
    // --- Arrange ---
    let mock = MockForeplay::start().await;
    mock.mount_board_ads(
        "board-2",
        vec![
            video_ad("v1", "One"),
            video_ad("v2", "Two"),
            video_ad("v3", "Three"),
        ],
    )
    .await;
    mock.mount_ad_detail("v1", ad_detail("v1", &[(0.0, 1.0, "ok")]))
        .await;
    mock.mount_ad_detail_error("v2", 500).await;
    mock.mount_ad_detail("v3", ad_detail("v3", &[(0.0, 1.0, "ok")]))
        .await;
    let client = mock.client()?;

    // --- Act ---
    let report = EnrichmentPipeline::new(&client)
        .with_delay(Duration::ZERO)
        .run("board-2")
        .await?;

    // --- Assert ---
    assert_eq!(report.len(), 3);
    assert_eq!(report.failed_count(), 1);
    let failed = &report.ads[1];
    assert!(matches!(failed.detail, DetailStatus::Failed { .. }));
    assert!(failed.error().unwrap_or_default().contains("500"));
    assert_eq!(failed.record.name(), "Two");
    assert_eq!(failed.record.full_transcription(), "");
    assert!(report.ads[2].is_merged());
    // A failed ad is exactly its listing entry, nothing added or dropped.
    let expected = match listed_ad("v2", "Two", "video") {
        Value::Object(map) => map,
        other => panic!("listing entry is not an object: {other}"),
    };
    assert_eq!(failed.record.as_map(), &expected);
    Ok(())
}

#[tokio::test]
async fn test_detail_fields_override_listing_fields() -> Result<()> {
    // --- Arrange ---
    let source = ScriptedSource::new(vec![video_ad("v1", "Listing name"), video_ad("v2", "Untouched")])
        .with_detail(
            "v1",
            json!({
                "ad_id": "v1",
                "name": "Detail name",
                "headline": "Detail headline",
                "full_transcription": "Spoken words",
                "video_duration": 12.0
            }),
        );

    // --- Act ---
    let report = EnrichmentPipeline::new(&source)
        .with_delay(Duration::ZERO)
        .run("merge")
        .await?;

    // --- Assert ---
    let merged = &report.ads[0].record;
    assert!(report.ads[0].is_merged());
    assert_eq!(merged.name(), "Detail name");
    assert_eq!(merged.headline(), "Detail headline");
    assert_eq!(merged.full_transcription(), "Spoken words");
    assert_eq!(merged.video_duration(), 12.0);
    // Keys the detail does not carry keep their listing values.
    assert_eq!(merged.brand_id(), "brand-v1");
    assert_eq!(merged.video_url(), "https://cdn.example.com/v1.mp4");
    // An empty detail leaves the listing entry as it was.
    assert_eq!(report.ads[1].record.name(), "Untouched");
    assert_eq!(report.ads[1].record.headline(), "Untouched headline");
    Ok(())
}

#[tokio::test]
async fn test_board_without_videos_is_empty_not_an_error() -> Result<()> {
    // --- Arrange ---
    let mock = MockForeplay::start().await;
    mock.mount_board_ads("images", vec![image_ad("i1", "Still")])
        .await;
    let client = mock.client()?;

    // --- Act ---
    let report = EnrichmentPipeline::new(&client).run("images").await?;

    // --- Assert ---
    assert!(report.is_empty());
    assert_eq!(report.listed, 1);
    assert_eq!(mock.request_paths().await, vec!["/api/board/ads"]);
    Ok(())
}

#[tokio::test]
async fn test_listing_is_a_single_page_of_two_hundred() -> Result<()> {
    // --- Arrange ---
    let source = ScriptedSource::new(vec![video_ad("v1", "Only")]);

    // --- Act ---
    EnrichmentPipeline::new(&source)
        .with_delay(Duration::ZERO)
        .run("big-board")
        .await?;

    // --- Assert ---
    assert_eq!(source.calls(), vec!["list:big-board:200", "detail:v1"]);
    Ok(())
}

#[tokio::test]
async fn test_listing_failure_aborts_the_run() -> Result<()> {
    // --- Arrange ---
    let source = ScriptedSource::new(vec![video_ad("v1", "Never fetched")]).failing_listing(401);

    // --- Act ---
    let result = EnrichmentPipeline::new(&source).run("locked").await;

    // --- Assert ---
    match result {
        Err(PipelineError::Listing { board_id, source: err }) => {
            assert_eq!(board_id, "locked");
            assert_eq!(err.status(), Some(401));
        }
        other => panic!("expected a listing error, got {other:?}"),
    }
    assert_eq!(source.calls(), vec!["list:locked:200"]);
    Ok(())
}

#[tokio::test]
async fn test_detail_fetches_are_spaced_by_the_delay() -> Result<()> {
    // --- Arrange ---
    let source = ScriptedSource::new(vec![
        video_ad("v1", "a"),
        video_ad("v2", "b"),
        video_ad("v3", "c"),
    ]);
    let started = Instant::now();

    // --- Act ---
    let report = EnrichmentPipeline::new(&source)
        .with_delay(Duration::from_millis(50))
        .run("paced")
        .await?;

    // --- Assert ---
    assert_eq!(report.len(), 3);
    assert!(started.elapsed() >= Duration::from_millis(100));
    Ok(())
}

#[tokio::test]
async fn test_progress_reports_every_stage() -> Result<()> {
    // --- Arrange ---
    let source = ScriptedSource::new(vec![video_ad("v1", "a"), image_ad("i1", "b")])
        .failing_detail("v1");
    let mut stages = Vec::new();

    // --- Act ---
    EnrichmentPipeline::new(&source)
        .with_delay(Duration::ZERO)
        .run_with_progress("watched", |stage| stages.push(stage.clone()))
        .await?;

    // --- Assert ---
    assert_eq!(
        stages,
        vec![
            PipelineStage::Listing {
                board_id: "watched".to_string()
            },
            PipelineStage::Filtering { listed: 2 },
            PipelineStage::DetailFetching {
                index: 1,
                total: 1,
                name: "a".to_string()
            },
            PipelineStage::Done {
                fetched: 0,
                failed: 1
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_record_without_identifier_is_marked_failed() -> Result<()> {
    // --- Arrange ---
    let source = ScriptedSource::new(vec![
        serde_json::json!({"name": "anonymous", "display_format": "video"}),
        video_ad("v2", "named"),
    ]);

    // --- Act ---
    let report = EnrichmentPipeline::new(&source)
        .with_delay(Duration::ZERO)
        .run("partial")
        .await?;

    // --- Assert ---
    assert_eq!(report.len(), 2);
    assert!(!report.ads[0].is_merged());
    assert!(report.ads[1].is_merged());
    assert_eq!(source.calls(), vec!["list:partial:200", "detail:v2"]);
    Ok(())
}
