use serde::{Deserialize, Serialize};

use super::common::LinkObject;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IssueCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "project_id", skip_serializing_if = "Option::is_none")]
    pub project: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "assigned_to_id", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct IssueCategoryData {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<LinkObject>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<LinkObject>,
}
