//! # Foreplay API Client
//!
//! The transport for every catalog operation: bearer authentication, base URL
//! resolution, status checking, and JSON decoding. Also provides one typed
//! method per operation.

use crate::config::ClientConfig;
use crate::constants::{BOARD_PAGE_LIMIT, CREDITS_HEADER};
use crate::endpoints::Endpoint;
use crate::errors::ClientError;
use crate::params::{AdFilters, Page, QueryParams};
use crate::types::AdRecord;
use reqwest::{header, Client as ReqwestClient, Method, Url};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info};

/// A client for the Foreplay public API.
///
/// Cloning is cheap; clones share the connection pool and the credits reading.
#[derive(Clone)]
pub struct ForeplayClient {
    http: ReqwestClient,
    base_url: Url,
    api_key: Option<String>,
    credits_remaining: Arc<RwLock<Option<String>>>,
}

impl fmt::Debug for ForeplayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeplayClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

/// A builder for creating `ForeplayClient` instances.
#[derive(Debug, Default)]
pub struct ForeplayClientBuilder {
    config: ClientConfig,
}

impl ForeplayClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<ForeplayClient, ClientError> {
        ForeplayClient::new(self.config)
    }
}

impl ForeplayClient {
    pub fn builder() -> ForeplayClientBuilder {
        ForeplayClientBuilder::new()
    }

    /// Creates a client from a configuration. A missing API key is not an error yet.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::ReqwestClientBuild)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.filter(|k| !k.is_empty()),
            credits_remaining: Arc::new(RwLock::new(None)),
        })
    }

    /// Creates a client from `FOREPLAY_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The last `X-Credits-Remaining` value seen on any response.
    pub fn credits_remaining(&self) -> Option<String> {
        self.credits_remaining
            .read()
            .ok()
            .and_then(|guard| guard.clone())
    }

    /// Resolves a relative path such as `api/ad/123` against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, ClientError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.resolve_segments(segments.as_slice())
    }

    fn resolve_segments<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Performs a request and returns the decoded JSON body.
    ///
    /// Any status outside 2xx/3xx becomes [`ClientError::Http`]. Nothing is retried.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = self.resolve(path)?;
        self.send(method, url, query, body).await
    }

    /// Executes one catalog operation.
    pub async fn call(&self, endpoint: &Endpoint) -> Result<Value, ClientError> {
        let url = self.resolve_segments(endpoint.path_segments().as_slice())?;
        let query = endpoint.query();
        debug!(operation = endpoint.name(), path = %endpoint.path(), "Calling Foreplay API");
        self.send(endpoint.method(), url, Some(&query), None).await
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::MissingApiKey)?;

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(api_key)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ClientError::Request)?;

        if let Some(credits) = response
            .headers()
            .get(CREDITS_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            info!(credits_remaining = %credits, "Foreplay credits remaining");
            if let Ok(mut slot) = self.credits_remaining.write() {
                *slot = Some(credits.to_string());
            }
        }

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(ClientError::Deserialization)
    }

    // --- Swipefile ---

    pub async fn swipefile_ads(&self, filters: AdFilters, page: Page) -> Result<Value, ClientError> {
        self.call(&Endpoint::SwipefileAds { filters, page }).await
    }

    // --- Boards ---

    pub async fn boards(&self) -> Result<Value, ClientError> {
        self.call(&Endpoint::Boards).await
    }

    pub async fn board_brands(&self, board_id: &str, page: Page) -> Result<Value, ClientError> {
        self.call(&Endpoint::BoardBrands {
            board_id: board_id.to_string(),
            page,
        })
        .await
    }

    pub async fn board_ads(
        &self,
        board_id: &str,
        filters: AdFilters,
        page: Page,
    ) -> Result<Value, ClientError> {
        self.call(&Endpoint::BoardAds {
            board_id: board_id.to_string(),
            filters,
            page,
        })
        .await
    }

    // --- Spyder ---

    pub async fn spyder_brands(&self, page: Page) -> Result<Value, ClientError> {
        self.call(&Endpoint::SpyderBrands { page }).await
    }

    pub async fn spyder_brand(&self, brand_id: &str) -> Result<Value, ClientError> {
        self.call(&Endpoint::SpyderBrand {
            brand_id: brand_id.to_string(),
        })
        .await
    }

    pub async fn spyder_brand_ads(
        &self,
        brand_id: &str,
        filters: AdFilters,
        page: Page,
    ) -> Result<Value, ClientError> {
        self.call(&Endpoint::SpyderBrandAds {
            brand_id: brand_id.to_string(),
            filters,
            page,
        })
        .await
    }

    // --- Ads ---

    /// Ad detail through `api/ad?ad_id=`.
    pub async fn ad(&self, ad_id: &str) -> Result<Value, ClientError> {
        self.call(&Endpoint::Ad {
            ad_id: ad_id.to_string(),
        })
        .await
    }

    /// Ad detail through `api/ad/{ad_id}`.
    pub async fn ad_by_id(&self, ad_id: &str) -> Result<Value, ClientError> {
        self.call(&Endpoint::AdById {
            ad_id: ad_id.to_string(),
        })
        .await
    }

    // --- Brands ---

    pub async fn ads_by_brand_id(
        &self,
        brand_id: &str,
        filters: AdFilters,
        page: Page,
    ) -> Result<Value, ClientError> {
        self.call(&Endpoint::AdsByBrandId {
            brand_id: brand_id.to_string(),
            filters,
            page,
        })
        .await
    }

    pub async fn ads_by_page_id(
        &self,
        page_id: &str,
        filters: AdFilters,
        page: Page,
    ) -> Result<Value, ClientError> {
        self.call(&Endpoint::AdsByPageId {
            page_id: page_id.to_string(),
            filters,
            page,
        })
        .await
    }

    /// Brands registered for a domain. Pass `None` to use the `most_ranked` default paging.
    pub async fn brands_by_domain(
        &self,
        domain: &str,
        page: Option<Page>,
    ) -> Result<Value, ClientError> {
        let endpoint = match page {
            Some(page) => Endpoint::BrandsByDomain {
                domain: domain.to_string(),
                page,
            },
            None => Endpoint::brands_by_domain(domain),
        };
        self.call(&endpoint).await
    }

    pub async fn brand_analytics(
        &self,
        id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        order: &str,
    ) -> Result<Value, ClientError> {
        self.call(&Endpoint::BrandAnalytics {
            id: id.to_string(),
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
            order: order.to_string(),
        })
        .await
    }

    // --- Discovery ---

    pub async fn discover_ads(
        &self,
        query: Option<&str>,
        filters: AdFilters,
        page: Page,
    ) -> Result<Value, ClientError> {
        self.call(&Endpoint::DiscoverAds {
            query: query.map(str::to_string),
            filters,
            page,
        })
        .await
    }

    pub async fn discover_brands(&self, query: Option<&str>, page: Page) -> Result<Value, ClientError> {
        self.call(&Endpoint::DiscoverBrands {
            query: query.map(str::to_string),
            page,
        })
        .await
    }

    // --- Usage ---

    /// Usage statistics. This call does not consume credits.
    pub async fn usage(&self) -> Result<Value, ClientError> {
        self.call(&Endpoint::Usage).await
    }
}

/// Pulls the `data` array out of a listing response.
pub fn listing_records(response: Value) -> Result<Vec<AdRecord>, ClientError> {
    match response {
        Value::Object(mut body) => match body.remove("data") {
            Some(Value::Array(items)) => Ok(items.into_iter().filter_map(AdRecord::from_value).collect()),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(ClientError::UnexpectedResponse(format!(
                "expected `data` to be an array, got {other}"
            ))),
        },
        other => Err(ClientError::UnexpectedResponse(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Normalizes an ad detail response into the fields to merge.
///
/// A response wrapped as `{"data": {...}}` is unwrapped; a flat object is used as is.
pub fn detail_fields(response: Value) -> Result<Map<String, Value>, ClientError> {
    match response {
        Value::Object(mut body) => match body.remove("data") {
            Some(Value::Object(inner)) => Ok(inner),
            Some(other) => {
                body.insert("data".to_string(), other);
                Ok(body)
            }
            None => Ok(body),
        },
        other => Err(ClientError::UnexpectedResponse(format!(
            "expected ad detail to be a JSON object, got {other}"
        ))),
    }
}

/// Default page used by the enrichment pipeline's single board listing.
pub fn board_listing_page() -> Page {
    Page::default().with_limit(BOARD_PAGE_LIMIT)
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw).map_err(|e| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> ForeplayClient {
        ForeplayClient::builder()
            .api_key("key")
            .base_url(base)
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_against_root() {
        let c = client("https://public.api.foreplay.co/");
        assert_eq!(
            c.resolve("api/usage").unwrap().as_str(),
            "https://public.api.foreplay.co/api/usage"
        );
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let c = client("http://localhost:8080/proxy");
        assert_eq!(
            c.resolve("api/ad/42").unwrap().as_str(),
            "http://localhost:8080/proxy/api/ad/42"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ForeplayClient::builder()
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_listing_records_tolerates_missing_data() {
        assert!(listing_records(json!({"metadata": {}})).unwrap().is_empty());
        let records = listing_records(json!({"data": [{"id": "a"}, 3, {"id": "b"}]})).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_detail_fields_unwraps_data_object() {
        let wrapped = detail_fields(json!({"data": {"ad_id": "a"}, "metadata": {}})).unwrap();
        assert_eq!(wrapped.get("ad_id"), Some(&json!("a")));
        assert!(!wrapped.contains_key("metadata"));

        let flat = detail_fields(json!({"ad_id": "b", "name": "n"})).unwrap();
        assert_eq!(flat.len(), 2);
    }
}
