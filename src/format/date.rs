//! Posted-date parsing with an explicit failure taxonomy

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt;

/// Legacy Twitter timestamp, e.g. `Wed Oct 10 20:19:24 +0000 2018`
const TWITTER_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Outcome of reading a tweet's posted timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostedDate {
    Valid(DateTime<Utc>),
    /// Missing, or present but not a recognisable time
    Unavailable,
    /// Present with a JSON type that cannot hold a time at all
    FormatError,
}

impl PostedDate {
    pub fn parse(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => PostedDate::Unavailable,
            Some(Value::String(s)) => parse_str(s.trim())
                .map(PostedDate::Valid)
                .unwrap_or(PostedDate::Unavailable),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .map(PostedDate::Valid)
                .unwrap_or(PostedDate::Unavailable),
            Some(Value::Bool(_)) | Some(Value::Array(_)) | Some(Value::Object(_)) => {
                PostedDate::FormatError
            }
        }
    }
}

impl fmt::Display for PostedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostedDate::Valid(date) => write!(f, "{}", date.format(DISPLAY_FORMAT)),
            PostedDate::Unavailable => f.write_str("Date unavailable"),
            PostedDate::FormatError => f.write_str("Date format error"),
        }
    }
}

fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_str(s, TWITTER_FORMAT) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(s) {
        return Some(date.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
