//! Reference data whose wire shape is used as-is.

use serde::{Deserialize, Serialize};

use super::common::{is_false, LinkObject};

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct IssueStatus {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Tracker {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_status: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Enumeration {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Enumeration lists exposed under `/enumerations/<kind>.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationKind {
    IssuePriorities,
    TimeEntryActivities,
    DocumentCategories,
}

impl EnumerationKind {
    /// Path segment, which is also the list key of the response.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumerationKind::IssuePriorities => "issue_priorities",
            EnumerationKind::TimeEntryActivities => "time_entry_activities",
            EnumerationKind::DocumentCategories => "document_categories",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues_visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_entries_visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_visibility: Option<String>,
    /// Only returned by `/roles/<id>.json`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

/// Custom field definition (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct CustomField {
    pub id: u64,
    pub name: String,
    /// `issue`, `project`, `user`, `time_entry`, ...
    #[serde(default)]
    pub customized_type: String,
    /// `string`, `list`, `date`, `bool`, ...
    #[serde(default)]
    pub field_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_filter: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub searchable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_values: Vec<PossibleValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PossibleValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Saved issue query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Query {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
}
