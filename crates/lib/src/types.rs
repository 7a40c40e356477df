//! # Ad Records
//!
//! The service returns loosely-shaped JSON objects. `AdRecord` keeps the object
//! intact, so nothing the service sent is lost in a JSON export, and exposes
//! typed accessors for the fields the rest of the workspace reads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One timestamped piece of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(rename = "startTime", default)]
    pub start_time: f64,
    #[serde(rename = "endTime", default)]
    pub end_time: f64,
    #[serde(default)]
    pub sentence: String,
}

impl TranscriptSegment {
    /// Reads one entry of a `timestamped_transcription` array.
    ///
    /// Every entry yields a segment: a missing, `null` or non-numeric time is
    /// `0.0` and a missing or `null` sentence is empty.
    pub fn from_value(value: &Value) -> Self {
        let time = |key: &str| match value.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };
        let sentence = match value.get("sentence") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Self {
            start_time: time("startTime"),
            end_time: time("endTime"),
            sentence,
        }
    }
}

/// An advertising creative, as returned by a listing or detail call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdRecord(Map<String, Value>);

impl From<Map<String, Value>> for AdRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl AdRecord {
    /// Wraps a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overlays `detail` onto this record; detail values win on key collision.
    pub fn merge(&mut self, detail: Map<String, Value>) {
        for (key, value) in detail {
            self.0.insert(key, value);
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The identifier used by the listing endpoints (`id`), falling back to `ad_id`.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id").or_else(|| self.str_field("ad_id"))
    }

    /// The identifier used in exports (`ad_id`), falling back to `id`.
    pub fn ad_id(&self) -> &str {
        self.str_field("ad_id")
            .or_else(|| self.str_field("id"))
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.str_field("name").unwrap_or_default()
    }

    pub fn brand_id(&self) -> &str {
        self.str_field("brand_id").unwrap_or_default()
    }

    pub fn brand_name(&self) -> Option<&str> {
        self.str_field("brand_name")
    }

    /// Raw description as sent by the service, which may contain `<br>` tags.
    pub fn description(&self) -> &str {
        self.str_field("description").unwrap_or_default()
    }

    /// Description with HTML line breaks turned into newlines.
    pub fn description_text(&self) -> String {
        normalize_line_breaks(self.description())
    }

    pub fn headline(&self) -> &str {
        self.str_field("headline").unwrap_or_default()
    }

    pub fn full_transcription(&self) -> &str {
        self.str_field("full_transcription").unwrap_or_default()
    }

    pub fn has_transcript(&self) -> bool {
        !self.full_transcription().is_empty()
    }

    /// The raw timestamped transcription array; `null` or missing becomes empty.
    pub fn raw_segments(&self) -> Vec<Value> {
        match self.0.get("timestamped_transcription") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// Timestamped segments in the order the service sent them, one per array entry.
    pub fn segments(&self) -> Vec<TranscriptSegment> {
        match self.0.get("timestamped_transcription") {
            Some(Value::Array(items)) => items.iter().map(TranscriptSegment::from_value).collect(),
            _ => Vec::new(),
        }
    }

    pub fn segment_count(&self) -> usize {
        match self.0.get("timestamped_transcription") {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// Video length in seconds, `0.0` when unknown.
    pub fn video_duration(&self) -> f64 {
        self.0
            .get("video_duration")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn display_format(&self) -> &str {
        self.str_field("display_format").unwrap_or_default()
    }

    pub fn is_video(&self) -> bool {
        self.display_format() == crate::constants::VIDEO_FORMAT
    }

    /// Publisher platforms; the service sends either a list or a single string.
    pub fn publisher_platforms(&self) -> Vec<String> {
        match self.0.get("publisher_platform") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn live(&self) -> bool {
        self.0.get("live").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn video_url(&self) -> &str {
        self.str_field("video").unwrap_or_default()
    }

    pub fn link_url(&self) -> &str {
        self.str_field("link_url").unwrap_or_default()
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.str_field("thumbnail").filter(|s| !s.is_empty())
    }
}

/// Replaces `<br />` and `<br>` with newlines.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("<br />", "\n").replace("<br>", "\n")
}
