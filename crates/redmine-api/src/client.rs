use serde::Serialize;

use crate::envelope::{self, Resource};
use crate::error::{RedmineError, Result};
use crate::models::*;
use crate::transport::{compile_query, Transport};

/// Redmine REST API client.
///
/// Each method is a single blocking round trip. The client only holds
/// immutable configuration, so one instance can be shared across threads.
pub struct RedmineClient {
    transport: Transport,
}

impl RedmineClient {
    /// Create a client for `base_url` (e.g. `https://redmine.example.com`)
    /// authenticating with the user's API key.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let transport = Transport::new(base_url).with_headers(&[
            ("X-Redmine-API-Key", api_key),
            ("Content-Type", "application/json"),
            ("Accept", "application/json"),
        ]);
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    fn fetch<R: Resource>(&self, path: &str) -> Result<R> {
        envelope::decode(&self.transport.get(path)?)
    }

    fn fetch_wire<R: Resource>(&self, path: &str) -> Result<R::Wire> {
        envelope::decode_wire::<R>(&self.transport.get(path)?)
    }

    fn fetch_list<R: Resource>(&self, path: &str) -> Result<(Vec<R::Wire>, Pagination)> {
        envelope::decode_list::<R>(&self.transport.get(path)?)
    }

    /// POST `resource` and return the server's copy of it. An empty response
    /// leaves the input as it was.
    fn post_resource<R: Resource + Serialize>(&self, path: &str, resource: R) -> Result<R> {
        let body = self.transport.post(path, &envelope::encode(&resource)?)?;
        if is_empty(&body) {
            return Ok(resource);
        }
        envelope::decode(&body)
    }

    /// PUT `resource`; Redmine normally answers updates with 204 and no body,
    /// in which case the input is returned unchanged.
    fn put_resource<R: Resource + Serialize>(&self, path: &str, resource: R) -> Result<R> {
        let body = self.transport.put(path, &envelope::encode(&resource)?)?;
        if is_empty(&body) {
            return Ok(resource);
        }
        envelope::decode(&body)
    }

    /// PUT `resource` and return the wire form from the response, if any.
    fn put_resource_wire<R: Resource + Serialize>(
        &self,
        path: &str,
        resource: &R,
    ) -> Result<Option<R::Wire>> {
        let body = self.transport.put(path, &envelope::encode(resource)?)?;
        if is_empty(&body) {
            return Ok(None);
        }
        envelope::decode_wire::<R>(&body).map(Some)
    }

    // ==================== Users ====================

    /// The user owning the API key.
    pub fn get_current_user(&self) -> Result<User> {
        self.fetch("/users/current.json")
    }

    pub fn get_user(&self, id: u64) -> Result<User> {
        self.fetch(&format!("/users/{}.json", id))
    }

    pub fn create_user(&self, user: User) -> Result<User> {
        self.post_resource("/users.json", user)
    }

    pub fn update_user(&self, user: User) -> Result<User> {
        let id = user.id.ok_or(RedmineError::MissingId("user"))?;
        self.put_resource(&format!("/users/{}.json", id), user)
    }

    pub fn delete_user(&self, id: u64) -> Result<()> {
        self.transport.delete(&format!("/users/{}.json", id))
    }

    pub fn list_users(&self, filters: &[&str]) -> Result<Vec<UserData>> {
        let (users, _) = self.list_users_with_pagination(filters)?;
        Ok(users)
    }

    pub fn list_users_with_pagination(
        &self,
        filters: &[&str],
    ) -> Result<(Vec<UserData>, Pagination)> {
        self.fetch_list::<User>(&format!("/users.json{}", compile_query(filters)))
    }

    // ==================== Issues ====================

    /// Get an issue with its journals and attachments, in wire form.
    pub fn get_issue(&self, id: u64) -> Result<IssueData> {
        self.fetch_wire::<Issue>(&format!(
            "/issues/{}.json?include=journals,attachments",
            id
        ))
    }

    pub fn create_issue(&self, issue: Issue) -> Result<Issue> {
        self.post_resource("/issues.json", issue)
    }

    /// Update an issue. Returns the server's copy in wire form when the
    /// response carries one; Redmine usually answers with no content.
    pub fn update_issue(&self, issue: &Issue) -> Result<Option<IssueData>> {
        let id = issue.id.ok_or(RedmineError::MissingId("issue"))?;
        self.put_resource_wire(&format!("/issues/{}.json", id), issue)
    }

    pub fn delete_issue(&self, id: u64) -> Result<()> {
        self.transport.delete(&format!("/issues/{}.json", id))
    }

    /// List issues, e.g. `list_issues(&["project_id=1", "status_id=open"])`.
    pub fn list_issues(&self, filters: &[&str]) -> Result<Vec<IssueData>> {
        let (issues, _) = self.list_issues_with_pagination(filters)?;
        Ok(issues)
    }

    pub fn list_issues_with_pagination(
        &self,
        filters: &[&str],
    ) -> Result<(Vec<IssueData>, Pagination)> {
        self.fetch_list::<Issue>(&format!("/issues.json{}", compile_query(filters)))
    }

    /// Issues of a project in the given status.
    pub fn list_issues_by_project(
        &self,
        project_id: u64,
        status_id: u64,
    ) -> Result<Vec<IssueData>> {
        let project = format!("project_id={}", project_id);
        let status = format!("status_id={}", status_id);
        self.list_issues(&[&project, &status])
    }

    /// Issues of a project in the given status assigned to the current user.
    pub fn list_my_issues_by_project(
        &self,
        project_id: u64,
        status_id: u64,
    ) -> Result<Vec<IssueData>> {
        let project = format!("project_id={}", project_id);
        let status = format!("status_id={}", status_id);
        self.list_issues(&["assigned_to_id=me", &project, &status])
    }

    // ==================== Projects ====================

    pub fn get_project(&self, id: u64) -> Result<Project> {
        self.fetch(&format!("/projects/{}.json", id))
    }

    /// Get a project by its identifier (the slug used in project URLs).
    pub fn get_project_by_code(&self, code: &str) -> Result<Project> {
        self.fetch(&format!("/projects/{}.json", urlencoding::encode(code)))
    }

    pub fn create_project(&self, project: Project) -> Result<Project> {
        self.post_resource("/projects.json", project)
    }

    pub fn update_project(&self, project: Project) -> Result<Project> {
        let id = project.id.ok_or(RedmineError::MissingId("project"))?;
        self.put_resource(&format!("/projects/{}.json", id), project)
    }

    pub fn delete_project(&self, id: u64) -> Result<()> {
        self.transport.delete(&format!("/projects/{}.json", id))
    }

    pub fn list_projects(&self, filters: &[&str]) -> Result<Vec<ProjectData>> {
        let (projects, _) = self.list_projects_with_pagination(filters)?;
        Ok(projects)
    }

    pub fn list_projects_with_pagination(
        &self,
        filters: &[&str],
    ) -> Result<(Vec<ProjectData>, Pagination)> {
        self.fetch_list::<Project>(&format!("/projects.json{}", compile_query(filters)))
    }

    // ==================== Memberships ====================

    pub fn get_membership(&self, id: u64) -> Result<Membership> {
        self.fetch(&format!("/memberships/{}.json", id))
    }

    /// Add a member to `membership.project`.
    pub fn create_membership(&self, membership: Membership) -> Result<Membership> {
        let project = membership
            .project
            .ok_or(RedmineError::MissingId("project"))?;
        self.post_resource(&format!("/projects/{}/memberships.json", project), membership)
    }

    pub fn update_membership(&self, membership: Membership) -> Result<Membership> {
        let id = membership.id.ok_or(RedmineError::MissingId("membership"))?;
        self.put_resource(&format!("/memberships/{}.json", id), membership)
    }

    pub fn delete_membership(&self, id: u64) -> Result<()> {
        self.transport.delete(&format!("/memberships/{}.json", id))
    }

    pub fn list_memberships(&self, project_id: u64) -> Result<Vec<MembershipData>> {
        let path = format!("/projects/{}/memberships.json", project_id);
        Ok(self.fetch_list::<Membership>(&path)?.0)
    }

    pub fn list_memberships_by_code(&self, project_code: &str) -> Result<Vec<MembershipData>> {
        let path = format!(
            "/projects/{}/memberships.json",
            urlencoding::encode(project_code)
        );
        Ok(self.fetch_list::<Membership>(&path)?.0)
    }

    // ==================== Issue relations ====================

    pub fn get_relation(&self, id: u64) -> Result<IssueRelation> {
        self.fetch(&format!("/relations/{}.json", id))
    }

    /// Relate `relation.issue_id` to `relation.issue_to_id`.
    pub fn create_relation(&self, relation: IssueRelation) -> Result<IssueRelation> {
        let issue = relation.issue_id.ok_or(RedmineError::MissingId("issue"))?;
        self.post_resource(&format!("/issues/{}/relations.json", issue), relation)
    }

    pub fn update_relation(&self, relation: IssueRelation) -> Result<IssueRelation> {
        let id = relation.id.ok_or(RedmineError::MissingId("relation"))?;
        self.put_resource(&format!("/relations/{}.json", id), relation)
    }

    pub fn delete_relation(&self, id: u64) -> Result<()> {
        self.transport.delete(&format!("/relations/{}.json", id))
    }

    pub fn list_relations(&self, issue_id: u64) -> Result<Vec<IssueRelation>> {
        let path = format!("/issues/{}/relations.json", issue_id);
        Ok(self.fetch_list::<IssueRelation>(&path)?.0)
    }

    // ==================== Versions ====================

    pub fn get_version(&self, id: u64) -> Result<Version> {
        self.fetch(&format!("/versions/{}.json", id))
    }

    /// Create a version in `version.project`.
    pub fn create_version(&self, version: Version) -> Result<Version> {
        let project = version.project.ok_or(RedmineError::MissingId("project"))?;
        self.post_resource(&format!("/projects/{}/versions.json", project), version)
    }

    pub fn update_version(&self, version: Version) -> Result<Version> {
        let id = version.id.ok_or(RedmineError::MissingId("version"))?;
        self.put_resource(&format!("/versions/{}.json", id), version)
    }

    pub fn delete_version(&self, id: u64) -> Result<()> {
        self.transport.delete(&format!("/versions/{}.json", id))
    }

    pub fn list_versions(&self, project_id: u64) -> Result<Vec<VersionData>> {
        let path = format!("/projects/{}/versions.json", project_id);
        Ok(self.fetch_list::<Version>(&path)?.0)
    }

    pub fn list_versions_by_code(&self, project_code: &str) -> Result<Vec<VersionData>> {
        let path = format!(
            "/projects/{}/versions.json",
            urlencoding::encode(project_code)
        );
        Ok(self.fetch_list::<Version>(&path)?.0)
    }

    // ==================== Wiki ====================

    pub fn get_wiki_page(&self, project: &str, title: &str) -> Result<WikiPage> {
        self.fetch(&wiki_path(project, title))
    }

    /// Create a page titled `page.title`. Redmine creates and updates wiki
    /// pages with the same PUT request.
    pub fn create_wiki_page(&self, project: &str, page: WikiPage) -> Result<WikiPage> {
        let path = wiki_path(project, page_title(&page)?);
        self.put_resource(&path, page)
    }

    pub fn update_wiki_page(&self, project: &str, page: WikiPage) -> Result<WikiPage> {
        self.create_wiki_page(project, page)
    }

    pub fn delete_wiki_page(&self, project: &str, title: &str) -> Result<()> {
        self.transport.delete(&wiki_path(project, title))
    }

    /// Index of the project's wiki; page texts are not included.
    pub fn list_wiki_pages(&self, project: &str) -> Result<Vec<WikiPageData>> {
        let path = format!("/projects/{}/wiki/index.json", urlencoding::encode(project));
        Ok(self.fetch_list::<WikiPage>(&path)?.0)
    }

    // ==================== Issue categories ====================

    pub fn get_issue_category(&self, id: u64) -> Result<IssueCategoryData> {
        self.fetch_wire::<IssueCategory>(&format!("/issue_categories/{}.json", id))
    }

    /// Create a category in `category.project`.
    pub fn create_issue_category(&self, category: IssueCategory) -> Result<IssueCategory> {
        let project = category.project.ok_or(RedmineError::MissingId("project"))?;
        self.post_resource(
            &format!("/projects/{}/issue_categories.json", project),
            category,
        )
    }

    pub fn update_issue_category(
        &self,
        category: &IssueCategory,
    ) -> Result<Option<IssueCategoryData>> {
        let id = category
            .id
            .ok_or(RedmineError::MissingId("issue category"))?;
        self.put_resource_wire(&format!("/issue_categories/{}.json", id), category)
    }

    pub fn delete_issue_category(&self, id: u64) -> Result<()> {
        self.transport
            .delete(&format!("/issue_categories/{}.json", id))
    }

    pub fn list_issue_categories(&self, project_id: u64) -> Result<Vec<IssueCategoryData>> {
        let path = format!("/projects/{}/issue_categories.json", project_id);
        Ok(self.fetch_list::<IssueCategory>(&path)?.0)
    }

    pub fn list_issue_categories_by_code(
        &self,
        project_code: &str,
    ) -> Result<Vec<IssueCategoryData>> {
        let path = format!(
            "/projects/{}/issue_categories.json",
            urlencoding::encode(project_code)
        );
        Ok(self.fetch_list::<IssueCategory>(&path)?.0)
    }

    // ==================== Time entries ====================

    pub fn get_time_entry(&self, id: u64) -> Result<TimeEntry> {
        self.fetch(&format!("/time_entries/{}.json", id))
    }

    pub fn create_time_entry(&self, entry: TimeEntry) -> Result<TimeEntry> {
        self.post_resource("/time_entries.json", entry)
    }

    pub fn update_time_entry(&self, entry: TimeEntry) -> Result<TimeEntry> {
        let id = entry.id.ok_or(RedmineError::MissingId("time entry"))?;
        self.put_resource(&format!("/time_entries/{}.json", id), entry)
    }

    pub fn delete_time_entry(&self, id: u64) -> Result<()> {
        self.transport.delete(&format!("/time_entries/{}.json", id))
    }

    pub fn list_time_entries(&self, filters: &[&str]) -> Result<Vec<TimeEntryData>> {
        let (entries, _) = self.list_time_entries_with_pagination(filters)?;
        Ok(entries)
    }

    pub fn list_time_entries_with_pagination(
        &self,
        filters: &[&str],
    ) -> Result<(Vec<TimeEntryData>, Pagination)> {
        self.fetch_list::<TimeEntry>(&format!("/time_entries.json{}", compile_query(filters)))
    }

    pub fn list_time_entries_by_project(
        &self,
        project_id: u64,
        filters: &[&str],
    ) -> Result<Vec<TimeEntryData>> {
        let path = format!(
            "/projects/{}/time_entries.json{}",
            project_id,
            compile_query(filters)
        );
        Ok(self.fetch_list::<TimeEntry>(&path)?.0)
    }

    pub fn list_time_entries_by_project_code(
        &self,
        project_code: &str,
        filters: &[&str],
    ) -> Result<Vec<TimeEntryData>> {
        let path = format!(
            "/projects/{}/time_entries.json{}",
            urlencoding::encode(project_code),
            compile_query(filters)
        );
        Ok(self.fetch_list::<TimeEntry>(&path)?.0)
    }

    // ==================== Files and attachments ====================

    pub fn get_attachment(&self, id: u64) -> Result<Attachment> {
        self.fetch(&format!("/attachments/{}.json", id))
    }

    /// Upload raw bytes; the returned token is then referenced by
    /// `create_file` or an issue's uploads.
    pub fn upload_file(&self, filename: &str, bytes: &[u8]) -> Result<Upload> {
        let path = format!("/uploads.json?filename={}", urlencoding::encode(filename));
        envelope::decode(&self.transport.post_octets(&path, bytes)?)
    }

    /// Publish an uploaded file (`file.token`) in a project's Files section.
    pub fn create_file(&self, project: &str, file: File) -> Result<File> {
        let path = format!("/projects/{}/files.json", urlencoding::encode(project));
        self.post_resource(&path, file)
    }

    pub fn list_files(&self, project_id: u64) -> Result<Vec<FileData>> {
        let path = format!("/projects/{}/files.json", project_id);
        Ok(self.fetch_list::<File>(&path)?.0)
    }

    pub fn list_files_by_code(&self, project_code: &str) -> Result<Vec<FileData>> {
        let path = format!("/projects/{}/files.json", urlencoding::encode(project_code));
        Ok(self.fetch_list::<File>(&path)?.0)
    }

    // ==================== News ====================

    pub fn list_news(&self, filters: &[&str]) -> Result<Vec<NewsData>> {
        Ok(self
            .fetch_list::<News>(&format!("/news.json{}", compile_query(filters)))?
            .0)
    }

    pub fn list_news_by_project(&self, project: &str) -> Result<Vec<NewsData>> {
        let path = format!("/projects/{}/news.json", urlencoding::encode(project));
        Ok(self.fetch_list::<News>(&path)?.0)
    }

    // ==================== Search ====================

    /// Search the whole instance. `query` is percent-encoded and always sent
    /// as the first parameter.
    pub fn search(&self, query: &str, filters: &[&str]) -> Result<Vec<SearchResult>> {
        let path = format!("/search.json{}", search_query(query, filters));
        Ok(self.fetch_list::<SearchResult>(&path)?.0)
    }

    pub fn search_by_project(
        &self,
        project_id: u64,
        query: &str,
        filters: &[&str],
    ) -> Result<Vec<SearchResult>> {
        let path = format!(
            "/projects/{}/search.json{}",
            project_id,
            search_query(query, filters)
        );
        Ok(self.fetch_list::<SearchResult>(&path)?.0)
    }

    pub fn search_by_project_code(
        &self,
        project_code: &str,
        query: &str,
        filters: &[&str],
    ) -> Result<Vec<SearchResult>> {
        let path = format!(
            "/projects/{}/search.json{}",
            urlencoding::encode(project_code),
            search_query(query, filters)
        );
        Ok(self.fetch_list::<SearchResult>(&path)?.0)
    }

    // ==================== Reference data ====================

    pub fn list_issue_statuses(&self) -> Result<Vec<IssueStatus>> {
        Ok(self.fetch_list::<IssueStatus>("/issue_statuses.json")?.0)
    }

    pub fn list_trackers(&self) -> Result<Vec<Tracker>> {
        Ok(self.fetch_list::<Tracker>("/trackers.json")?.0)
    }

    pub fn list_enumerations(&self, kind: EnumerationKind) -> Result<Vec<Enumeration>> {
        let body = self
            .transport
            .get(&format!("/enumerations/{}.json", kind.as_str()))?;
        Ok(envelope::decode_list_keyed::<Enumeration>(&body, kind.as_str())?.0)
    }

    pub fn get_role(&self, id: u64) -> Result<Role> {
        self.fetch(&format!("/roles/{}.json", id))
    }

    pub fn list_roles(&self) -> Result<Vec<Role>> {
        Ok(self.fetch_list::<Role>("/roles.json")?.0)
    }

    /// Requires admin privileges.
    pub fn list_custom_fields(&self) -> Result<Vec<CustomField>> {
        Ok(self.fetch_list::<CustomField>("/custom_fields.json")?.0)
    }

    pub fn list_queries(&self) -> Result<Vec<Query>> {
        Ok(self.fetch_list::<Query>("/queries.json")?.0)
    }

    pub fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.fetch_list::<Group>("/groups.json")?.0)
    }
}

fn is_empty(body: &[u8]) -> bool {
    body.iter().all(|b| b.is_ascii_whitespace())
}

fn wiki_path(project: &str, title: &str) -> String {
    format!(
        "/projects/{}/wiki/{}.json",
        urlencoding::encode(project),
        urlencoding::encode(title)
    )
}

fn page_title(page: &WikiPage) -> Result<&str> {
    page.title
        .as_deref()
        .ok_or(RedmineError::MissingId("wiki page title"))
}

/// `?q=<encoded query>` followed by the caller's filters.
fn search_query(query: &str, filters: &[&str]) -> String {
    let mut params = Vec::with_capacity(filters.len() + 1);
    params.push(format!("q={}", urlencoding::encode(query)));
    params.extend(filters.iter().map(|f| f.to_string()));
    compile_query(&params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_is_encoded_and_first() {
        assert_eq!(search_query("a b&c", &[]), "?q=a%20b%26c");
        assert_eq!(
            search_query("a b&c", &["issues=1", "titles_only=1", "limit=10"]),
            "?q=a%20b%26c&issues=1&titles_only=1&limit=10"
        );
    }

    #[test]
    fn wiki_path_encodes_title() {
        assert_eq!(
            wiki_path("redmine", "Release Notes"),
            "/projects/redmine/wiki/Release%20Notes.json"
        );
    }

    #[test]
    fn whitespace_body_counts_as_empty() {
        assert!(is_empty(b""));
        assert!(is_empty(b" \n"));
        assert!(!is_empty(b"{}"));
    }

    #[test]
    fn update_without_id_fails_before_any_request() {
        // Port 9 (discard) is never contacted: the id check comes first.
        let client = RedmineClient::new("http://127.0.0.1:9", "key");
        let err = client.update_issue(&Issue::default()).unwrap_err();
        assert!(matches!(err, RedmineError::MissingId("issue")));

        let err = client.create_version(Version::default()).unwrap_err();
        assert!(matches!(err, RedmineError::MissingId("project")));
    }
}
