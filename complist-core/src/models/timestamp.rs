//! Timestamp interpretation.
//!
//! Upstream endpoints disagree on how they encode points in time: some send
//! epoch seconds, some epoch milliseconds, some ISO-8601 text, and a few send
//! values nobody can interpret. [`Timestamp`] keeps what could be parsed as a
//! UTC instant and preserves everything else verbatim.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Epoch values above this are milliseconds, below it seconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;

/// Numeric text shorter than this is not read as an epoch (`"2024"`, `"20240301"`).
const MIN_EPOCH_DIGITS: usize = 9;

/// Naive datetime layouts accepted in addition to RFC 3339, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S",
];

/// A record timestamp as received from upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// A value that was interpreted as a UTC instant.
    Parsed(DateTime<Utc>),
    /// Text that could not be interpreted, kept as received.
    Raw(String),
}

impl Timestamp {
    /// Interprets a JSON value.
    ///
    /// Returns `None` for `null`, empty strings, and values with nothing to
    /// compare (objects, arrays, booleans).
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                let raw = n.to_string();
                Some(
                    n.as_f64()
                        .and_then(from_epoch)
                        .map_or(Self::Raw(raw), Self::Parsed),
                )
            }
            Value::String(s) => Self::parse_str(s),
            _ => None,
        }
    }

    /// Interprets a text value. Returns `None` only for blank input.
    pub fn parse_str(input: &str) -> Option<Self> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        if is_epoch_text(text) {
            if let Some(dt) = text.parse::<f64>().ok().and_then(from_epoch) {
                return Some(Self::Parsed(dt));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Self::Parsed(dt.with_timezone(&Utc)));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Self::Parsed(naive.and_utc()));
            }
        }

        if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Some(Self::Parsed(midnight.and_utc()));
        }

        Some(Self::Raw(text.to_string()))
    }

    /// Returns the instant, if this timestamp was interpretable.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Parsed(dt) => Some(*dt),
            Self::Raw(_) => None,
        }
    }

    /// Renders the export text: RFC 3339 UTC for parsed values, verbatim
    /// text otherwise. Sub-second digits appear only when non-zero.
    pub fn render(&self) -> String {
        match self {
            Self::Parsed(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Self::Raw(text) => text.clone(),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Parsed(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.render())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(Self::from_json(&value).unwrap_or_else(|| Self::Raw(String::new())))
    }
}

/// Digits with an optional sign and fraction, long enough to be an epoch.
fn is_epoch_text(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    whole.len() >= MIN_EPOCH_DIGITS
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

#[allow(clippy::cast_possible_truncation)]
fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() > EPOCH_MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    DateTime::from_timestamp_millis(millis.round() as i64)
}

// ============================================================================
// Tests
// ============================================================================
