use serde::{Deserialize, Serialize};

/// Relation between two issues. The wire and logical shapes are the same.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct IssueRelation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_to_id: Option<u64>,
    /// `relates`, `duplicates`, `blocks`, `precedes`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
    /// Days between `precedes`/`follows` issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
}
