//! Date handling for Redmine payloads.
//!
//! Redmine sends two kinds of dates: date-only fields (`start_date`,
//! `due_date`, `spent_on`) as `YYYY-MM-DD`, and timestamps (`created_on`,
//! `updated_on`, ...) as RFC 3339. The mapping layer never fails a whole
//! decode because one date is malformed: both kinds fall back to `None` and
//! the fallback is logged. The strict parsers are public for callers who want
//! the error instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{RedmineError, Result};

/// Fixed format of date-only fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date-only string such as `2024-03-15`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| RedmineError::DateParse(format!("'{}': {}", value, e)))
}

/// Parse an RFC 3339 timestamp such as `2024-03-15T09:30:00Z`.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| RedmineError::DateParse(format!("'{}': {}", value, e)))
}

/// Lenient date-only parse: empty or unparsable input yields `None`.
pub fn date_or_none(value: Option<&str>) -> Option<NaiveDate> {
    let value = value.filter(|v| !v.is_empty())?;
    match parse_date(value) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("Ignoring malformed date: {}", e);
            None
        }
    }
}

/// Lenient timestamp parse: empty or unparsable input yields `None`.
pub fn timestamp_or_none(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value.filter(|v| !v.is_empty())?;
    match parse_timestamp(value) {
        Ok(ts) => Some(ts),
        Err(e) => {
            log::warn!("Ignoring malformed timestamp: {}", e);
            None
        }
    }
}

/// `deserialize_with` adapter for wire timestamp fields.
pub(crate) fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(timestamp_or_none(raw.as_deref()))
}
