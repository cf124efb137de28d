use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::attachment::AttachmentData;
use super::common::{CustomFieldValue, LinkObject};
use crate::dates::lenient_timestamp;

/// Issue as an application works with it: foreign keys are plain ids.
///
/// This is also the shape sent on create and update; unset fields are left
/// out of the request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Issue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "project_id", skip_serializing_if = "Option::is_none")]
    pub project: Option<u64>,
    #[serde(rename = "tracker_id", skip_serializing_if = "Option::is_none")]
    pub tracker: Option<u64>,
    #[serde(rename = "status_id", skip_serializing_if = "Option::is_none")]
    pub status: Option<u64>,
    #[serde(rename = "priority_id", skip_serializing_if = "Option::is_none")]
    pub priority: Option<u64>,
    #[serde(rename = "author_id", skip_serializing_if = "Option::is_none")]
    pub author: Option<u64>,
    #[serde(rename = "assigned_to_id", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<u64>,
    #[serde(rename = "category_id", skip_serializing_if = "Option::is_none")]
    pub category: Option<u64>,
    #[serde(rename = "fixed_version_id", skip_serializing_if = "Option::is_none")]
    pub fixed_version: Option<u64>,
    #[serde(rename = "parent_issue_id", skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    /// Journal note added with an update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_ratio: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing)]
    pub spent_hours: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldValue>,
    #[serde(skip_serializing)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub closed_on: Option<DateTime<Utc>>,
}

impl Issue {
    /// Markdown announcement linking back to the issue on `base_url`.
    pub fn message(&self, base_url: &str) -> String {
        let id = self.id.unwrap_or_default();
        format!(
            "[#{} {}]({}/issues/{})\n\n {} \n\n=====================================",
            id,
            self.subject.as_deref().unwrap_or_default(),
            base_url.trim_end_matches('/'),
            id,
            self.description.as_deref().unwrap_or_default()
        )
    }
}

/// Issue exactly as Redmine returns it.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct IssueData {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_version: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<LinkObject>,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Date-only, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Date-only, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub done_ratio: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_hours: Option<f64>,
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
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub closed_on: Option<DateTime<Utc>>,
    /// Only present when requested with `include=journals`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub journals: Vec<IssueJournal>,
    /// Only present when requested with `include=attachments`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentData>,
}

/// One entry of an issue's history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct IssueJournal {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<JournalDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct JournalDetail {
    pub property: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}
