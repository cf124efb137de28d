//! Single-key JSON envelopes.
//!
//! Redmine wraps every entity in an object keyed by the resource name:
//! `{"issue": {...}}` for one entity, `{"issues": [...], "total_count": N,
//! "offset": N, "limit": N}` for a list. Every resource is described once in
//! the table at the bottom of this module; the wrap/unwrap logic below is
//! shared by all of them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RedmineError, Result};
use crate::models::*;

/// A Redmine resource and how its wire shape maps onto it.
///
/// Converting resources have a separate `*Data` wire type; identity resources
/// use their own type as the wire type.
pub trait Resource: Sized {
    /// Envelope key for a single entity.
    const SINGULAR: &'static str;
    /// Envelope key for a list of entities.
    const PLURAL: &'static str;
    type Wire: DeserializeOwned;

    fn from_wire(wire: Self::Wire) -> Self;
}

/// Wrap `value` as `{ name: value }`.
pub fn wrap<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Value> {
    let mut envelope = Map::with_capacity(1);
    envelope.insert(name.to_string(), serde_json::to_value(value)?);
    Ok(Value::Object(envelope))
}

/// Read the payload stored under `name` in an envelope.
pub fn unwrap<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<T> {
    let mut envelope: Map<String, Value> = serde_json::from_slice(bytes)?;
    let inner = envelope
        .remove(name)
        .ok_or_else(|| RedmineError::Decode(format!("missing `{}` envelope", name)))?;
    serde_json::from_value(inner).map_err(|e| RedmineError::Decode(format!("`{}`: {}", name, e)))
}

/// Decode a single-entity body into the logical form.
pub fn decode<R: Resource>(bytes: &[u8]) -> Result<R> {
    decode_wire::<R>(bytes).map(R::from_wire)
}

/// Decode a single-entity body, keeping the wire form.
pub fn decode_wire<R: Resource>(bytes: &[u8]) -> Result<R::Wire> {
    unwrap(R::SINGULAR, bytes)
}

/// Encode a logical value as a request body.
pub fn encode<R: Resource + Serialize>(resource: &R) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&wrap(R::SINGULAR, resource)?)?)
}

/// Decode a list body. Items stay in wire form and keep server order.
pub fn decode_list<R: Resource>(bytes: &[u8]) -> Result<(Vec<R::Wire>, Pagination)> {
    decode_list_keyed(bytes, R::PLURAL)
}

/// Decode a list body whose key is only known at runtime (enumerations).
pub fn decode_list_keyed<T: DeserializeOwned>(
    bytes: &[u8],
    key: &str,
) -> Result<(Vec<T>, Pagination)> {
    let mut body: Map<String, Value> = serde_json::from_slice(bytes)?;
    let items = body
        .remove(key)
        .ok_or_else(|| RedmineError::Decode(format!("missing `{}` list", key)))?;
    let items: Vec<T> = serde_json::from_value(items)
        .map_err(|e| RedmineError::Decode(format!("`{}`: {}", key, e)))?;
    let pagination: Pagination = serde_json::from_value(Value::Object(body))
        .map_err(|e| RedmineError::Decode(format!("pagination: {}", e)))?;
    Ok((items, pagination))
}

macro_rules! resource {
    ($logical:ty => $wire:ty, $singular:literal, $plural:literal) => {
        impl Resource for $logical {
            const SINGULAR: &'static str = $singular;
            const PLURAL: &'static str = $plural;
            type Wire = $wire;

            fn from_wire(wire: $wire) -> Self {
                Self::from(wire)
            }
        }
    };
    ($identity:ty, $singular:literal, $plural:literal) => {
        impl Resource for $identity {
            const SINGULAR: &'static str = $singular;
            const PLURAL: &'static str = $plural;
            type Wire = Self;

            fn from_wire(wire: Self) -> Self {
                wire
            }
        }
    };
}

resource!(User => UserData, "user", "users");
resource!(Project => ProjectData, "project", "projects");
resource!(Issue => IssueData, "issue", "issues");
resource!(Membership => MembershipData, "membership", "memberships");
resource!(Version => VersionData, "version", "versions");
resource!(WikiPage => WikiPageData, "wiki_page", "wiki_pages");
resource!(Attachment => AttachmentData, "attachment", "attachments");
resource!(File => FileData, "file", "files");
resource!(TimeEntry => TimeEntryData, "time_entry", "time_entries");
resource!(News => NewsData, "news", "news");
resource!(IssueCategory => IssueCategoryData, "issue_category", "issue_categories");
resource!(IssueRelation, "relation", "relations");
resource!(IssueStatus, "issue_status", "issue_statuses");
resource!(Tracker, "tracker", "trackers");
resource!(Role, "role", "roles");
resource!(CustomField, "custom_field", "custom_fields");
resource!(Query, "query", "queries");
resource!(Group, "group", "groups");
resource!(SearchResult, "result", "results");
resource!(Upload, "upload", "uploads");

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::fmt::Debug;

    fn assert_identity<W>(name: &str, payload: Value)
    where
        W: Serialize + DeserializeOwned + PartialEq + Debug,
    {
        let wire: W = serde_json::from_value(payload).unwrap();
        let bytes = serde_json::to_vec(&wrap(name, &wire).unwrap()).unwrap();
        let back: W = unwrap(name, &bytes).unwrap();
        assert_eq!(back, wire);
    }

    fn issue_json() -> Value {
        json!({
            "id": 42,
            "project": {"id": 1, "name": "Redmine"},
            "tracker": {"id": 2, "name": "Feature"},
            "status": {"id": 3, "name": "In Progress"},
            "priority": {"id": 4, "name": "Normal"},
            "author": {"id": 5, "name": "John Smith"},
            "assigned_to": {"id": 6, "name": "Jane Doe"},
            "fixed_version": {"id": 7, "name": "1.0"},
            "parent": {"id": 40},
            "subject": "Add REST filters",
            "description": "Filters on custom fields",
            "start_date": "2024-01-10",
            "due_date": "2024-01-31",
            "done_ratio": 30,
            "is_private": false,
            "estimated_hours": 8.0,
            "spent_hours": 2.5,
            "custom_fields": [
                {"id": 1, "name": "Browser", "value": "Firefox"},
                {"id": 2, "name": "Platforms", "value": ["Linux", "macOS"]}
            ],
            "created_on": "2024-01-10T08:00:00Z",
            "updated_on": "2024-01-11T09:30:00Z",
            "closed_on": null,
            "journals": [{
                "id": 100,
                "user": {"id": 5, "name": "John Smith"},
                "notes": "Started",
                "created_on": "2024-01-11T09:30:00Z",
                "details": [{"property": "attr", "name": "status_id", "old_value": "1", "new_value": "3"}]
            }],
            "attachments": [{
                "id": 9,
                "filename": "trace.log",
                "filesize": 2048,
                "content_type": "text/plain",
                "content_url": "https://redmine.example/attachments/download/9/trace.log",
                "author": {"id": 5, "name": "John Smith"},
                "created_on": "2024-01-10T08:05:00Z"
            }]
        })
    }

    #[test]
    fn envelope_identity_holds_for_wire_types() {
        assert_identity::<IssueData>("issue", issue_json());
        assert_identity::<ProjectData>(
            "project",
            json!({
                "id": 1, "name": "Redmine", "identifier": "redmine",
                "description": "", "parent": {"id": 3, "name": "Ruby"},
                "status": 1, "is_public": true,
                "created_on": "2007-09-29T10:03:04Z", "updated_on": "2009-03-15T11:35:11Z"
            }),
        );
        assert_identity::<UserData>(
            "user",
            json!({
                "id": 3, "login": "jplang", "firstname": "Jean-Philippe", "lastname": "Lang",
                "mail": "jp@example.net", "admin": true, "api_key": "ebc3f6b781a6fb3f2b0a83ce0ebb80e0d585189d",
                "created_on": "2007-09-28T00:16:04Z", "last_login_on": "2011-08-22T15:25:45Z",
                "groups": [{"id": 20, "name": "Developers"}],
                "memberships": [{"id": 1, "project": {"id": 1, "name": "Redmine"}, "roles": [{"id": 3, "name": "Manager"}]}]
            }),
        );
        assert_identity::<MembershipData>(
            "membership",
            json!({"id": 1, "project": {"id": 1, "name": "Redmine"}, "group": {"id": 20, "name": "Developers"}, "roles": []}),
        );
        assert_identity::<VersionData>(
            "version",
            json!({
                "id": 2, "project": {"id": 1, "name": "Redmine"}, "name": "1.0",
                "status": "open", "due_date": "2024-06-30", "sharing": "none",
                "created_on": "2024-01-01T00:00:00Z"
            }),
        );
        assert_identity::<TimeEntryData>(
            "time_entry",
            json!({
                "id": 4, "project": {"id": 1, "name": "Redmine"}, "issue": {"id": 42},
                "user": {"id": 5, "name": "John Smith"}, "activity": {"id": 9, "name": "Development"},
                "hours": 1.25, "comments": "Review", "spent_on": "2024-01-11"
            }),
        );
        assert_identity::<IssueRelation>(
            "relation",
            json!({"id": 1819, "issue_id": 8470, "issue_to_id": 8469, "relation_type": "relates", "delay": null}),
        );
        assert_identity::<Tracker>(
            "tracker",
            json!({"id": 1, "name": "Bug", "default_status": {"id": 1, "name": "New"}}),
        );
    }

    #[test]
    fn envelope_identity_holds_for_secondary_wire_types() {
        assert_identity::<WikiPageData>(
            "wiki_page",
            json!({
                "title": "Installation", "parent": {"title": "Wiki"},
                "text": "h1. Installation", "version": 3,
                "author": {"id": 5, "name": "John Smith"}, "comments": "Typo",
                "created_on": "2024-01-10T08:00:00Z", "updated_on": "2024-01-12T10:00:00Z"
            }),
        );
        assert_identity::<AttachmentData>(
            "attachment",
            json!({
                "id": 6, "filename": "screenshot.png", "filesize": 4210,
                "content_type": "image/png", "description": "Login page",
                "content_url": "https://redmine.example.com/attachments/download/6/screenshot.png",
                "thumbnail_url": "https://redmine.example.com/attachments/thumbnail/6",
                "author": {"id": 5, "name": "John Smith"}, "created_on": "2024-01-10T08:00:00Z"
            }),
        );
        assert_identity::<FileData>(
            "file",
            json!({
                "id": 12, "filename": "redmine-5.1.0.tar.gz", "filesize": 3215671,
                "content_type": "application/gzip", "description": "Release tarball",
                "content_url": "https://redmine.example.com/attachments/download/12/redmine-5.1.0.tar.gz",
                "author": {"id": 1, "name": "Admin"}, "version": {"id": 7, "name": "5.1.0"},
                "digest": "f3a9c1e0", "downloads": 48, "created_on": "2024-02-01T12:00:00Z"
            }),
        );
        assert_identity::<NewsData>(
            "news",
            json!({
                "id": 2, "project": {"id": 1, "name": "Redmine"}, "author": {"id": 1, "name": "Admin"},
                "title": "Redmine 5.1 released", "summary": "New release",
                "description": "Redmine 5.1.0 is available.", "created_on": "2024-02-01T12:00:00Z"
            }),
        );
        assert_identity::<IssueCategoryData>(
            "issue_category",
            json!({
                "id": 10, "project": {"id": 1, "name": "Redmine"}, "name": "UI",
                "assigned_to": {"id": 6, "name": "Jane Doe"}
            }),
        );
        assert_identity::<IssueStatus>(
            "issue_status",
            json!({"id": 5, "name": "Closed", "is_default": false, "is_closed": true}),
        );
        assert_identity::<Enumeration>(
            "issue_priority",
            json!({"id": 4, "name": "Normal", "is_default": true, "active": true}),
        );
        assert_identity::<Role>(
            "role",
            json!({
                "id": 3, "name": "Manager", "assignable": true,
                "issues_visibility": "all", "time_entries_visibility": "all",
                "users_visibility": "members_of_visible_projects",
                "permissions": ["add_project", "edit_project", "view_issues"]
            }),
        );
        assert_identity::<CustomField>(
            "custom_field",
            json!({
                "id": 1, "name": "Browser", "customized_type": "issue", "field_format": "list",
                "regexp": "", "min_length": 1, "max_length": 30, "is_required": true,
                "is_filter": true, "searchable": true, "multiple": false,
                "default_value": "Firefox", "visible": true,
                "possible_values": [{"value": "Firefox"}, {"value": "Chrome", "label": "Google Chrome"}]
            }),
        );
        assert_identity::<Query>(
            "query",
            json!({"id": 8, "name": "Open bugs", "is_public": true, "project_id": 1}),
        );
        assert_identity::<Group>("group", json!({"id": 20, "name": "Developers"}));
        assert_identity::<SearchResult>(
            "result",
            json!({
                "id": 42, "title": "Bug #42 (New): Login fails", "type": "issue",
                "url": "https://redmine.example.com/issues/42",
                "description": "Login fails with LDAP", "datetime": "2024-01-10T08:00:00Z"
            }),
        );
        assert_identity::<Upload>("upload", json!({"id": 7, "token": "7.ed32257a2ab0f7526c0d72c32994c58b"}));
    }

    #[test]
    fn decode_converts_to_logical_form() {
        let body = serde_json::to_vec(&json!({ "issue": issue_json() })).unwrap();

        let issue: Issue = decode(&body).unwrap();

        assert_eq!(issue.id, Some(42));
        assert_eq!(issue.project, Some(1));
        assert_eq!(issue.assigned_to, Some(6));
        assert_eq!(issue.parent, Some(40));
        assert_eq!(issue.start_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(issue.custom_fields.len(), 2);
        assert_eq!(
            issue.custom_fields[1].value,
            Some(FieldValue::Multiple(vec!["Linux".into(), "macOS".into()]))
        );
    }

    #[test]
    fn decode_wire_keeps_journals_and_attachments() {
        let body = serde_json::to_vec(&json!({ "issue": issue_json() })).unwrap();

        let issue = decode_wire::<Issue>(&body).unwrap();

        assert_eq!(issue.journals.len(), 1);
        assert_eq!(issue.journals[0].details[0].new_value.as_deref(), Some("3"));
        assert_eq!(issue.attachments[0].filename, "trace.log");
        assert_eq!(issue.start_date.as_deref(), Some("2024-01-10"));
    }

    #[test]
    fn missing_envelope_key_is_a_decode_error() {
        let body = br#"{"project": {"id": 1, "name": "Redmine", "identifier": "redmine"}}"#;
        let err = decode::<Issue>(body).unwrap_err();
        assert!(matches!(err, RedmineError::Decode(ref m) if m.contains("`issue`")));
    }

    #[test]
    fn shape_mismatch_is_a_decode_error() {
        let body = br#"{"issue": {"id": "forty-two"}}"#;
        assert!(matches!(decode::<Issue>(body), Err(RedmineError::Decode(_))));

        let body = br#"{"issue": null}"#;
        assert!(matches!(decode::<Issue>(body), Err(RedmineError::Decode(_))));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(decode::<Issue>(b"<html>"), Err(RedmineError::Json(_))));
    }

    #[test]
    fn unparsable_dates_do_not_fail_the_decode() {
        let body = br#"{"issue": {
            "id": 1,
            "subject": "Dates",
            "start_date": "31/01/2024",
            "created_on": "31/01/2024"
        }}"#;

        let issue: Issue = decode(body).unwrap();

        assert_eq!(issue.start_date, None);
        assert_eq!(issue.created_on, None);
    }

    #[test]
    fn encode_wraps_logical_form_and_omits_unset_fields() {
        let issue = Issue {
            project: Some(1),
            tracker: Some(2),
            subject: Some("New feature".to_string()),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };

        let body: Value = serde_json::from_slice(&encode(&issue).unwrap()).unwrap();

        assert_eq!(
            body,
            json!({"issue": {
                "project_id": 1,
                "tracker_id": 2,
                "subject": "New feature",
                "due_date": "2024-03-01"
            }})
        );
    }

    #[test]
    fn encode_never_sends_server_managed_fields() {
        let body = br#"{"user": {"id": 3, "login": "jplang", "firstname": "Jean-Philippe",
            "lastname": "Lang", "api_key": "secret", "created_on": "2007-09-28T00:16:04Z"}}"#;
        let user: User = decode(body).unwrap();

        let encoded: Value = serde_json::from_slice(&encode(&user).unwrap()).unwrap();

        let inner = &encoded["user"];
        assert_eq!(inner["login"], "jplang");
        assert!(inner.get("api_key").is_none());
        assert!(inner.get("created_on").is_none());
    }

    #[test]
    fn decode_list_keeps_order_and_pagination() {
        let issues: Vec<Value> = (1..=5)
            .map(|id| json!({"id": id, "subject": format!("Issue {}", id), "project": {"id": 1, "name": "Redmine"}}))
            .collect();
        let body = serde_json::to_vec(&json!({
            "issues": issues,
            "total_count": 5,
            "offset": 0,
            "limit": 25
        }))
        .unwrap();

        let (items, pagination) = decode_list::<Issue>(&body).unwrap();

        assert_eq!(
            pagination,
            Pagination {
                total_count: 5,
                offset: 0,
                limit: 25
            }
        );
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(items[0].project, Some(LinkObject::new(1, "Redmine")));
    }

    #[test]
    fn decode_list_without_pagination_defaults_to_zero() {
        let body = br#"{"trackers": [{"id": 1, "name": "Bug"}, {"id": 2, "name": "Feature"}]}"#;

        let (trackers, pagination) = decode_list::<Tracker>(body).unwrap();

        assert_eq!(trackers.len(), 2);
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn decode_list_null_pagination_reads_as_zero() {
        let body = br#"{"issues": [], "total_count": null, "offset": 0, "limit": null}"#;

        let (issues, pagination) = decode_list::<Issue>(body).unwrap();

        assert!(issues.is_empty());
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn decode_list_keyed_reads_runtime_key() {
        let body = br#"{"issue_priorities": [{"id": 3, "name": "Low"}, {"id": 4, "name": "Normal", "is_default": true}]}"#;

        let (priorities, _) = decode_list_keyed::<Enumeration>(body, "issue_priorities").unwrap();

        assert_eq!(priorities[1].name, "Normal");
        assert!(priorities[1].is_default);
    }

    #[test]
    fn decode_list_missing_key_is_a_decode_error() {
        let body = br#"{"projects": [], "total_count": 0}"#;
        assert!(matches!(
            decode_list::<Issue>(body),
            Err(RedmineError::Decode(_))
        ));
    }
}
