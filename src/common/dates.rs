// src/common/dates.rs
//! Lenient date parsing and ISO-8601 formatting for stored documents.
//!
//! Stored timestamps come from many writers: full RFC 3339 strings, naive
//! `YYYY-MM-DDTHH:MM:SS` values and plain `YYYY-MM-DD` dates. All of them
//! are read as UTC. Anything else is treated as absent rather than an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a stored timestamp, returning `None` for anything unrecognized
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a calendar date; full timestamps are truncated to their UTC date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .or_else(|| parse_timestamp(value).map(|dt| dt.date_naive()))
}

/// ISO-8601 with millisecond precision and a `Z` suffix
pub fn to_iso_string(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for optional timestamps: malformed input deserializes to
/// `None`, present values serialize as ISO-8601 strings.
pub mod lenient_timestamp {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&to_iso_string(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => parse_timestamp(&s),
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            _ => None,
        })
    }
}

/// Serde adapter for required timestamps stored as ISO-8601 strings
pub mod iso_timestamp {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_iso_string(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// A stored timestamp whose presence counts even when it cannot be read.
///
/// Empty strings, `null`, `false` and `0` count as absent. Any other value
/// is present: either a readable instant or kept verbatim as unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoredDate {
    #[default]
    Absent,
    Valid(DateTime<Utc>),
    Unreadable(String),
}

impl StoredDate {
    pub fn is_absent(&self) -> bool {
        matches!(self, StoredDate::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// The instant, when one could be read
    pub fn value(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredDate::Valid(dt) => Some(*dt),
            _ => None,
        }
    }

    fn from_json(raw: serde_json::Value) -> Self {
        use serde_json::Value;

        match raw {
            Value::Null | Value::Bool(false) => StoredDate::Absent,
            Value::String(s) if s.is_empty() => StoredDate::Absent,
            Value::String(s) => match parse_timestamp(&s) {
                Some(dt) => StoredDate::Valid(dt),
                None => StoredDate::Unreadable(s),
            },
            Value::Number(n) if n.as_f64() == Some(0.0) => StoredDate::Absent,
            Value::Number(n) => match n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis) {
                Some(dt) => StoredDate::Valid(dt),
                None => StoredDate::Unreadable(n.to_string()),
            },
            other => StoredDate::Unreadable(other.to_string()),
        }
    }
}

impl From<DateTime<Utc>> for StoredDate {
    fn from(value: DateTime<Utc>) -> Self {
        StoredDate::Valid(value)
    }
}

impl Serialize for StoredDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            StoredDate::Absent => serializer.serialize_none(),
            StoredDate::Valid(dt) => serializer.serialize_str(&to_iso_string(dt)),
            StoredDate::Unreadable(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for StoredDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(StoredDate::from_json(raw))
    }
}
