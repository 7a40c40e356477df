//! # Request Builder
//!
//! Query-parameter construction for the Foreplay API. Required parameters are
//! always written; optional filters are only written when they carry a value.
//! Nothing here validates enumerated values; the service is the authority.

use crate::constants::{DEFAULT_LIMIT, DEFAULT_OFFSET, DEFAULT_ORDER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single scalar query value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => write!(f, "{s}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
            QueryValue::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

/// The query-parameter mapping sent with one request.
///
/// Keys are kept sorted so the encoded query string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, QueryValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a required parameter.
    pub fn set(&mut self, key: &str, value: impl Into<QueryValue>) -> &mut Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Sets a string filter only when it is present and non-empty.
    pub fn set_str(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.set(key, v);
        }
        self
    }

    /// Sets a boolean filter only when it was explicitly chosen.
    ///
    /// `None` leaves the key absent, which is distinct from `Some(false)`.
    pub fn set_bool(&mut self, key: &str, value: Option<bool>) -> &mut Self {
        if let Some(v) = value {
            self.set(key, v);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Pagination and ordering shared by the listing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
    pub order: String,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
            order: DEFAULT_ORDER.to_string(),
        }
    }
}

impl Page {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    /// Writes `offset` and `limit`.
    pub(crate) fn apply_window(&self, params: &mut QueryParams) {
        params.set("offset", self.offset).set("limit", self.limit);
    }

    /// Writes `offset`, `limit` and `order`.
    pub(crate) fn apply(&self, params: &mut QueryParams) {
        self.apply_window(params);
        params.set("order", self.order.as_str());
    }
}

/// Optional filters accepted by the ad listing operations.
///
/// Which of these an operation actually sends, and under which key, is decided
/// by its [`FilterProfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdFilters {
    /// ISO date (`YYYY-MM-DD`); ads published after it.
    pub start_date: Option<String>,
    /// ISO date (`YYYY-MM-DD`); ads published before it.
    pub end_date: Option<String>,
    pub live: Option<bool>,
    pub display_format: Option<String>,
    pub publisher_platform: Option<String>,
    /// Sent as `niche` by the swipefile and as `niches` elsewhere.
    pub niche: Option<String>,
    pub market_target: Option<String>,
    /// Sent as `language` by the swipefile and as `languages` elsewhere.
    pub language: Option<String>,
    /// Free-text search, only understood by the swipefile and board listings.
    pub search: Option<String>,
}

/// The optional filter set an operation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterProfile {
    Swipefile,
    Board,
    Catalog,
    Discovery,
}

impl FilterProfile {
    /// Writes the filters this profile carries into `params`.
    pub fn apply(self, filters: &AdFilters, params: &mut QueryParams) {
        params
            .set_str("start_date", filters.start_date.as_deref())
            .set_str("end_date", filters.end_date.as_deref())
            .set_bool("live", filters.live)
            .set_str("display_format", filters.display_format.as_deref())
            .set_str("publisher_platform", filters.publisher_platform.as_deref());

        match self {
            FilterProfile::Swipefile => {
                params
                    .set_str("niche", filters.niche.as_deref())
                    .set_str("market_target", filters.market_target.as_deref())
                    .set_str("language", filters.language.as_deref())
                    .set_str("search", filters.search.as_deref());
            }
            FilterProfile::Board => {
                params.set_str("search", filters.search.as_deref());
            }
            FilterProfile::Catalog | FilterProfile::Discovery => {
                params
                    .set_str("niches", filters.niche.as_deref())
                    .set_str("market_target", filters.market_target.as_deref())
                    .set_str("languages", filters.language.as_deref());
            }
        }
    }
}
