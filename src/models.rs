//! Search request and tweet record types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Default number of tweets to return
pub const DEFAULT_LIMIT: usize = 20;

/// Ranking mode of the remote search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Recency ordered
    #[default]
    Latest,
    /// Relevance ordered
    Top,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Latest => "latest",
            Section::Top => "top",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "top" => Ok(Self::Top),
            _ => Err(Error::InvalidInput(format!(
                "Invalid section '{}'; expected 'latest' or 'top'",
                value
            ))),
        }
    }
}

/// A validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    section: Section,
    limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, section: Section, limit: usize) -> Result<Self> {
        let query = query.into();
        if query.is_empty() {
            return Err(Error::InvalidInput("Search query is required".to_string()));
        }
        if limit == 0 {
            return Err(Error::InvalidInput(
                "limit must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            query,
            section,
            limit,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// One tweet as returned by the remote API.
///
/// The record is kept as raw JSON; accessors cover the fields the formatter
/// reads. A key that is absent yields `None`, a key holding `null` yields
/// `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweetRecord(Map<String, Value>);

impl TweetRecord {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Raw field lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The author object, if it is an object
    pub fn user(&self) -> Option<&Map<String, Value>> {
        self.get("user").and_then(Value::as_object)
    }

    /// A field of the author object
    pub fn user_field(&self, key: &str) -> Option<&Value> {
        self.user().and_then(|user| user.get(key))
    }

    pub fn username(&self) -> Option<&Value> {
        self.user_field("username")
    }

    pub fn is_verified(&self) -> bool {
        ["is_blue_verified", "is_verified"]
            .iter()
            .any(|flag| self.user_field(flag).is_some_and(is_truthy))
    }

    pub fn text(&self) -> Option<&Value> {
        self.get("text")
    }

    /// Primary timestamp field, falling back to the secondary one when the
    /// primary is falsy
    pub fn posted_at(&self) -> Option<&Value> {
        self.get("created_at")
            .filter(|v| is_truthy(v))
            .or_else(|| self.get("creation_date"))
    }

    pub fn reply_to_id(&self) -> Option<&Value> {
        self.get("in_reply_to_status_id_str").filter(|v| is_truthy(v))
    }

    /// Attachment list, if present as an array
    pub fn media(&self) -> Option<&Vec<Value>> {
        self.get("media").and_then(Value::as_array)
    }

    /// True when any extended media entry is a video or animated gif
    pub fn has_extended_video(&self) -> bool {
        self.get("extended_entities")
            .and_then(|e| e.get("media"))
            .and_then(Value::as_array)
            .is_some_and(|entries| {
                entries.iter().any(|entry| {
                    matches!(
                        entry.get("type").and_then(Value::as_str),
                        Some("video") | Some("animated_gif")
                    )
                })
            })
    }

    pub fn video_url(&self) -> Option<&Value> {
        self.get("video_url").filter(|v| is_truthy(v))
    }

    /// Tweet id, preferring `id_str` over `tweet_id`
    pub fn id(&self) -> Option<&Value> {
        self.get("id_str")
            .filter(|v| is_truthy(v))
            .or_else(|| self.get("tweet_id").filter(|v| is_truthy(v)))
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default, deserialize_with = "deserialize_results")]
    pub results: Vec<TweetRecord>,
    #[serde(default, deserialize_with = "deserialize_token")]
    pub continuation_token: Option<String>,
}

fn deserialize_results<'de, D>(deserializer: D) -> std::result::Result<Vec<TweetRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    let total = items.len();
    let records: Vec<TweetRecord> = items
        .into_iter()
        .filter_map(TweetRecord::from_value)
        .collect();

    let dropped = total - records.len();
    if dropped > 0 {
        warn!(dropped, total, "Skipping non-object entries in search results");
    }
    Ok(records)
}

fn deserialize_token<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a possibly-missing JSON value the way string interpolation would:
/// absent fields print `undefined`, nulls print `null`, strings print raw.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
