use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::lenient_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    /// Result kind: `issue`, `wiki-page`, `news`, `changeset`, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub datetime: Option<DateTime<Utc>>,
}
