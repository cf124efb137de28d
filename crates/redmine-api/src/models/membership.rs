use serde::{Deserialize, Serialize};

use super::common::LinkObject;

/// Membership of a user in a project, with role ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Membership {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "project_id", skip_serializing_if = "Option::is_none")]
    pub project: Option<u64>,
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub user: Option<u64>,
    #[serde(rename = "role_ids", skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct MembershipData {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<LinkObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<LinkObject>,
    /// Set instead of `user` when a group is the member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<LinkObject>,
    #[serde(default)]
    pub roles: Vec<LinkObject>,
}
