use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{CustomFieldValue, LinkObject};
use crate::dates::lenient_timestamp;

/// Logged time in logical form; also the create/update request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimeEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "project_id", skip_serializing_if = "Option::is_none")]
    pub project: Option<u64>,
    #[serde(rename = "issue_id", skip_serializing_if = "Option::is_none")]
    pub issue: Option<u64>,
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub user: Option<u64>,
    #[serde(rename = "activity_id", skip_serializing_if = "Option::is_none")]
    pub activity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldValue>,
    #[serde(skip_serializing)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub updated_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TimeEntryData {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<LinkObject>,
    #[serde(default)]
    pub hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Date-only, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_on: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldValue>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_on: Option<DateTime<Utc>>,
}
