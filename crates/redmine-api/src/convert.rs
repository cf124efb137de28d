//! Conversions from wire form (`*Data`) to logical form.
//!
//! Link objects collapse to their ids and date-only strings are parsed with
//! the fixed `YYYY-MM-DD` format; anything unparsable becomes `None`.

use crate::dates::date_or_none;
use crate::models::common::link_id;
use crate::models::*;

impl From<IssueData> for Issue {
    fn from(data: IssueData) -> Self {
        Self {
            id: Some(data.id),
            project: link_id(&data.project),
            tracker: link_id(&data.tracker),
            status: link_id(&data.status),
            priority: link_id(&data.priority),
            author: link_id(&data.author),
            assigned_to: link_id(&data.assigned_to),
            category: link_id(&data.category),
            fixed_version: link_id(&data.fixed_version),
            parent: link_id(&data.parent),
            notes: None,
            is_private: Some(data.is_private),
            subject: Some(data.subject),
            description: data.description,
            start_date: date_or_none(data.start_date.as_deref()),
            due_date: date_or_none(data.due_date.as_deref()),
            done_ratio: Some(data.done_ratio),
            estimated_hours: data.estimated_hours,
            spent_hours: data.spent_hours,
            custom_fields: data.custom_fields,
            created_on: data.created_on,
            updated_on: data.updated_on,
            closed_on: data.closed_on,
        }
    }
}

impl From<ProjectData> for Project {
    fn from(data: ProjectData) -> Self {
        Self {
            id: Some(data.id),
            name: Some(data.name),
            identifier: Some(data.identifier),
            description: data.description,
            homepage: data.homepage,
            parent: link_id(&data.parent),
            is_public: Some(data.is_public),
            custom_fields: data.custom_fields,
            status: Some(data.status),
            created_on: data.created_on,
            updated_on: data.updated_on,
        }
    }
}

impl From<UserData> for User {
    fn from(data: UserData) -> Self {
        Self {
            id: Some(data.id),
            login: Some(data.login),
            firstname: Some(data.firstname),
            lastname: Some(data.lastname),
            mail: data.mail,
            password: None,
            status: data.status,
            admin: data.admin,
            custom_fields: data.custom_fields,
            api_key: data.api_key,
            created_on: data.created_on,
            last_login_on: data.last_login_on,
            memberships: data.memberships.into_iter().map(Into::into).collect(),
            groups: data.groups,
        }
    }
}

impl From<MembershipData> for Membership {
    fn from(data: MembershipData) -> Self {
        Self {
            id: Some(data.id),
            project: link_id(&data.project),
            user: link_id(&data.user),
            roles: data.roles.iter().map(|r| r.id).collect(),
        }
    }
}

impl From<VersionData> for Version {
    fn from(data: VersionData) -> Self {
        Self {
            id: Some(data.id),
            project: link_id(&data.project),
            name: Some(data.name),
            description: data.description,
            status: data.status,
            due_date: date_or_none(data.due_date.as_deref()),
            sharing: data.sharing,
            created_on: data.created_on,
            updated_on: data.updated_on,
        }
    }
}

impl From<WikiPageData> for WikiPage {
    fn from(data: WikiPageData) -> Self {
        Self {
            title: Some(data.title),
            text: data.text,
            version: Some(data.version),
            author: link_id(&data.author),
            comments: data.comments,
            parent: data.parent.map(|p| p.title),
            created_on: data.created_on,
            updated_on: data.updated_on,
        }
    }
}

impl From<AttachmentData> for Attachment {
    fn from(data: AttachmentData) -> Self {
        Self {
            id: data.id,
            filename: data.filename,
            filesize: data.filesize,
            content_type: data.content_type,
            description: data.description,
            content_url: data.content_url,
            thumbnail_url: data.thumbnail_url,
            author: link_id(&data.author),
            created_on: data.created_on,
        }
    }
}

impl From<FileData> for File {
    fn from(data: FileData) -> Self {
        Self {
            id: Some(data.id),
            token: None,
            filename: Some(data.filename),
            filesize: data.filesize,
            content_type: data.content_type,
            description: data.description,
            content_url: data.content_url,
            author: link_id(&data.author),
            version: link_id(&data.version),
            digest: data.digest,
            downloads: data.downloads,
            created_on: data.created_on,
        }
    }
}

impl From<TimeEntryData> for TimeEntry {
    fn from(data: TimeEntryData) -> Self {
        Self {
            id: Some(data.id),
            project: link_id(&data.project),
            issue: link_id(&data.issue),
            user: link_id(&data.user),
            activity: link_id(&data.activity),
            hours: Some(data.hours),
            comments: data.comments,
            spent_on: date_or_none(data.spent_on.as_deref()),
            custom_fields: data.custom_fields,
            created_on: data.created_on,
            updated_on: data.updated_on,
        }
    }
}

impl From<NewsData> for News {
    fn from(data: NewsData) -> Self {
        Self {
            id: Some(data.id),
            project: link_id(&data.project),
            author: link_id(&data.author),
            title: Some(data.title),
            summary: data.summary,
            description: data.description,
            created_on: data.created_on,
        }
    }
}

impl From<IssueCategoryData> for IssueCategory {
    fn from(data: IssueCategoryData) -> Self {
        Self {
            id: Some(data.id),
            project: link_id(&data.project),
            name: Some(data.name),
            assigned_to: link_id(&data.assigned_to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn link(id: u64) -> Option<LinkObject> {
        Some(LinkObject::new(id, &format!("link {}", id)))
    }

    #[test]
    fn issue_foreign_keys_match_link_ids() {
        let data = IssueData {
            id: 7,
            project: link(1),
            tracker: link(2),
            status: link(3),
            priority: link(4),
            author: link(5),
            assigned_to: link(6),
            category: link(8),
            fixed_version: link(9),
            parent: link(10),
            subject: "Crash on save".to_string(),
            ..Default::default()
        };

        let issue = Issue::from(data);

        assert_eq!(issue.id, Some(7));
        assert_eq!(issue.project, Some(1));
        assert_eq!(issue.tracker, Some(2));
        assert_eq!(issue.status, Some(3));
        assert_eq!(issue.priority, Some(4));
        assert_eq!(issue.author, Some(5));
        assert_eq!(issue.assigned_to, Some(6));
        assert_eq!(issue.category, Some(8));
        assert_eq!(issue.fixed_version, Some(9));
        assert_eq!(issue.parent, Some(10));
        assert_eq!(issue.subject.as_deref(), Some("Crash on save"));
    }

    #[test]
    fn missing_links_flatten_to_none() {
        let issue = Issue::from(IssueData {
            id: 1,
            ..Default::default()
        });
        assert_eq!(issue.assigned_to, None);
        assert_eq!(issue.parent, None);
    }

    #[test]
    fn issue_date_only_fields_are_parsed() {
        let issue = Issue::from(IssueData {
            id: 1,
            start_date: Some("2024-02-01".to_string()),
            due_date: Some("2024-02-29".to_string()),
            ..Default::default()
        });
        assert_eq!(issue.start_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(issue.due_date, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn unparsable_date_only_field_becomes_none() {
        let issue = Issue::from(IssueData {
            id: 1,
            start_date: Some("2024-02-30".to_string()),
            due_date: Some("soon".to_string()),
            ..Default::default()
        });
        assert_eq!(issue.start_date, None);
        assert_eq!(issue.due_date, None);
    }

    #[test]
    fn membership_roles_flatten_to_ids() {
        let membership = Membership::from(MembershipData {
            id: 3,
            project: link(1),
            user: link(2),
            group: None,
            roles: vec![LinkObject::new(4, "Manager"), LinkObject::new(5, "Developer")],
        });
        assert_eq!(membership.project, Some(1));
        assert_eq!(membership.user, Some(2));
        assert_eq!(membership.roles, vec![4, 5]);
    }

    #[test]
    fn user_memberships_are_converted() {
        let user = User::from(UserData {
            id: 9,
            login: "jsmith".to_string(),
            memberships: vec![MembershipData {
                id: 11,
                project: link(1),
                roles: vec![LinkObject::new(3, "Reporter")],
                ..Default::default()
            }],
            ..Default::default()
        });
        assert_eq!(user.login.as_deref(), Some("jsmith"));
        assert_eq!(user.memberships.len(), 1);
        assert_eq!(user.memberships[0].project, Some(1));
        assert_eq!(user.memberships[0].roles, vec![3]);
    }

    #[test]
    fn time_entry_links_and_spent_on() {
        let entry = TimeEntry::from(TimeEntryData {
            id: 5,
            project: link(1),
            issue: link(2),
            user: link(3),
            activity: link(9),
            hours: 1.5,
            spent_on: Some("2024-05-06".to_string()),
            ..Default::default()
        });
        assert_eq!(entry.project, Some(1));
        assert_eq!(entry.issue, Some(2));
        assert_eq!(entry.user, Some(3));
        assert_eq!(entry.activity, Some(9));
        assert_eq!(entry.hours, Some(1.5));
        assert_eq!(entry.spent_on, NaiveDate::from_ymd_opt(2024, 5, 6));
    }

    #[test]
    fn version_due_date_uses_date_only_format() {
        let version = Version::from(VersionData {
            id: 2,
            project: link(1),
            name: "1.0".to_string(),
            due_date: Some("2024-12-31".to_string()),
            ..Default::default()
        });
        assert_eq!(version.project, Some(1));
        assert_eq!(version.due_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn remaining_resources_flatten_links() {
        let category = IssueCategory::from(IssueCategoryData {
            id: 1,
            project: link(2),
            name: "UI".to_string(),
            assigned_to: link(3),
        });
        assert_eq!((category.project, category.assigned_to), (Some(2), Some(3)));

        let news = News::from(NewsData {
            id: 1,
            project: link(4),
            author: link(5),
            ..Default::default()
        });
        assert_eq!((news.project, news.author), (Some(4), Some(5)));

        let attachment = Attachment::from(AttachmentData {
            id: 1,
            author: link(6),
            ..Default::default()
        });
        assert_eq!(attachment.author, Some(6));

        let file = File::from(FileData {
            id: 1,
            author: link(7),
            version: link(8),
            ..Default::default()
        });
        assert_eq!((file.author, file.version), (Some(7), Some(8)));

        let page = WikiPage::from(WikiPageData {
            title: "Home".to_string(),
            author: link(9),
            parent: Some(WikiPageRef {
                title: "Index".to_string(),
            }),
            ..Default::default()
        });
        assert_eq!(page.author, Some(9));
        assert_eq!(page.parent.as_deref(), Some("Index"));

        let project = Project::from(ProjectData {
            id: 1,
            parent: link(10),
            ..Default::default()
        });
        assert_eq!(project.parent, Some(10));
    }
}
