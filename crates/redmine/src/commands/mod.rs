pub mod config;
pub mod issue;
pub mod project;
pub mod reference;
pub mod search;
pub mod time;
pub mod user;

use anyhow::{anyhow, Context, Result};
use redmine_api::RedmineClient;

/// A project as given on the command line: numeric id or identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRef<'a> {
    Id(u64),
    Code(&'a str),
}

impl<'a> ProjectRef<'a> {
    pub fn parse(value: &'a str) -> Self {
        match value.parse() {
            Ok(id) => ProjectRef::Id(id),
            Err(_) => ProjectRef::Code(value),
        }
    }

    /// Numeric id, looking the identifier up on the server when needed.
    pub fn resolve_id(self, client: &RedmineClient) -> Result<u64> {
        match self {
            ProjectRef::Id(id) => Ok(id),
            ProjectRef::Code(code) => client
                .get_project_by_code(code)
                .with_context(|| format!("Failed to resolve project '{}'", code))?
                .id
                .ok_or_else(|| anyhow!("Project '{}' has no id", code)),
        }
    }
}

/// `--project` if given, else the configured default project.
pub fn project_or_default<'a>(
    project: Option<&'a str>,
    default_project: Option<&'a str>,
) -> Result<ProjectRef<'a>> {
    project
        .or(default_project)
        .map(ProjectRef::parse)
        .ok_or_else(|| {
            anyhow!("No project given. Use --project or set default_project in the config file")
        })
}

/// Check `KEY=VALUE` filters and borrow them for the query string.
pub fn parse_filters(filters: &[String]) -> Result<Vec<&str>> {
    filters
        .iter()
        .map(|f| match f.split_once('=') {
            Some((key, _)) if !key.is_empty() => Ok(f.as_str()),
            _ => Err(anyhow!("Invalid filter '{}': expected KEY=VALUE", f)),
        })
        .collect()
}
