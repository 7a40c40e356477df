use anyhow::Result;
use async_trait::async_trait;
use boardscribe::{AdRecord, AdSource, ClientError, ForeplayClient};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_CREDITS: &str = "4200";

// --- Sample Payloads ---

/// A listing entry as `api/board/ads` returns it.
pub fn listed_ad(id: &str, name: &str, display_format: &str) -> Value {
    json!({
        "id": id,
        "ad_id": id,
        "name": name,
        "brand_id": format!("brand-{id}"),
        "description": format!("Description of {name}<br />second line"),
        "headline": format!("{name} headline"),
        "display_format": display_format,
        "publisher_platform": ["facebook", "instagram"],
        "live": true,
        "video": format!("https://cdn.example.com/{id}.mp4"),
        "link_url": format!("https://shop.example.com/{id}"),
        "thumbnail": format!("https://cdn.example.com/{id}.jpg"),
    })
}

pub fn video_ad(id: &str, name: &str) -> Value {
    listed_ad(id, name, "video")
}

pub fn image_ad(id: &str, name: &str) -> Value {
    listed_ad(id, name, "image")
}

/// An ad detail payload carrying a transcript built from `segments`.
pub fn ad_detail(id: &str, segments: &[(f64, f64, &str)]) -> Value {
    let full = segments
        .iter()
        .map(|(_, _, s)| s.trim())
        .collect::<Vec<_>>()
        .join(" ");
    let timestamped: Vec<Value> = segments
        .iter()
        .map(|(start, end, sentence)| json!({"startTime": start, "endTime": end, "sentence": sentence}))
        .collect();
    let duration = segments.last().map(|(_, end, _)| *end).unwrap_or(0.0);
    json!({
        "ad_id": id,
        "full_transcription": full,
        "timestamped_transcription": timestamped,
        "video_duration": duration,
    })
}

pub fn record(value: Value) -> AdRecord {
    AdRecord::from_value(value).unwrap_or_default()
}

// --- Mock Foreplay Server ---

/// A wiremock server that answers like the Foreplay API.
pub struct MockForeplay {
    pub server: MockServer,
}

impl MockForeplay {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        format!("{}/", self.server.uri())
    }

    /// A client pointed at this server, authenticated with [`TEST_API_KEY`].
    pub fn client(&self) -> Result<ForeplayClient> {
        Ok(ForeplayClient::builder()
            .api_key(TEST_API_KEY)
            .base_url(self.uri())
            .timeout_secs(5)
            .build()?)
    }

    pub async fn mount_board_ads(&self, board_id: &str, ads: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/board/ads"))
            .and(query_param("board_id", board_id))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Credits-Remaining", TEST_CREDITS)
                    .set_body_json(json!({ "data": ads, "metadata": { "success": true } })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_board_ads_error(&self, board_id: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/api/board/ads"))
            .and(query_param("board_id", board_id))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_ad_detail(&self, ad_id: &str, detail: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/ad/{ad_id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Credits-Remaining", TEST_CREDITS)
                    .set_body_json(json!({ "data": detail })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_ad_detail_error(&self, ad_id: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/api/ad/{ad_id}")))
            .respond_with(ResponseTemplate::new(status).set_body_string("detail unavailable"))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_usage(&self, usage: Value) {
        Mock::given(method("GET"))
            .and(path("/api/usage"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Credits-Remaining", TEST_CREDITS)
                    .set_body_json(usage),
            )
            .mount(&self.server)
            .await;
    }

    /// A failing usage lookup that still reports the credits header.
    pub async fn mount_usage_error(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/api/usage"))
            .respond_with(
                ResponseTemplate::new(status)
                    .insert_header("X-Credits-Remaining", TEST_CREDITS)
                    .set_body_string("usage unavailable"),
            )
            .mount(&self.server)
            .await;
    }

    /// Paths of every request received so far, in arrival order.
    pub async fn request_paths(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }
}

// --- Scripted Ad Source ---

/// An in-memory [`AdSource`] that records the calls made to it.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    listing: Arc<Mutex<Vec<AdRecord>>>,
    details: Arc<Mutex<HashMap<String, Map<String, Value>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    listing_error: Arc<Mutex<Option<u16>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSource {
    pub fn new(listing: Vec<Value>) -> Self {
        let source = Self::default();
        *source.listing.lock().unwrap() = listing.into_iter().map(record).collect();
        source
    }

    pub fn with_detail(self, ad_id: &str, detail: Value) -> Self {
        if let Value::Object(map) = detail {
            self.details.lock().unwrap().insert(ad_id.to_string(), map);
        }
        self
    }

    pub fn failing_detail(self, ad_id: &str) -> Self {
        self.failing.lock().unwrap().insert(ad_id.to_string());
        self
    }

    pub fn failing_listing(self, status: u16) -> Self {
        *self.listing_error.lock().unwrap() = Some(status);
        self
    }

    /// Calls in order, as `list:<board>:<limit>` or `detail:<id>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdSource for ScriptedSource {
    async fn list_board_ads(&self, board_id: &str, limit: u32) -> Result<Vec<AdRecord>, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("list:{board_id}:{limit}"));
        if let Some(status) = *self.listing_error.lock().unwrap() {
            return Err(ClientError::Http {
                status,
                body: "listing failed".to_string(),
            });
        }
        Ok(self.listing.lock().unwrap().clone())
    }

    async fn ad_detail(&self, ad_id: &str) -> Result<Map<String, Value>, ClientError> {
        self.calls.lock().unwrap().push(format!("detail:{ad_id}"));
        if self.failing.lock().unwrap().contains(ad_id) {
            return Err(ClientError::Http {
                status: 500,
                body: "detail failed".to_string(),
            });
        }
        Ok(self
            .details
            .lock()
            .unwrap()
            .get(ad_id)
            .cloned()
            .unwrap_or_default())
    }
}
