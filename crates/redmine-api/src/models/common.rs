use serde::{Deserialize, Deserializer, Serialize};

/// Foreign key as the server sends it: an id plus a display name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct LinkObject {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

impl LinkObject {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// Flatten an optional link object to its id.
pub(crate) fn link_id(link: &Option<LinkObject>) -> Option<u64> {
    link.as_ref().map(|l| l.id)
}

/// Value of a custom field, single or multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

/// Custom field value attached to an issue, project, user or time entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomFieldValue {
    pub id: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
}

/// Pagination block present in every list response. Missing or `null`
/// fields read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_count: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub offset: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub limit: u64,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
