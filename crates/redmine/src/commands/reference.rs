//! Project-scoped lists and instance-wide reference data.

use super::{project_or_default, ProjectRef};
use crate::cli::{EnumKind, OutputFormat};
use crate::output::output_list;
use anyhow::{Context, Result};
use redmine_api::{EnumerationKind, RedmineClient};

pub fn handle_versions(
    client: &RedmineClient,
    project: Option<&str>,
    default_project: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let versions = match project_or_default(project, default_project)? {
        ProjectRef::Id(id) => client.list_versions(id),
        ProjectRef::Code(code) => client.list_versions_by_code(code),
    }
    .context("Failed to list versions")?;

    output_list(&versions, format);
    Ok(())
}

pub fn handle_memberships(
    client: &RedmineClient,
    project: Option<&str>,
    default_project: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let memberships = match project_or_default(project, default_project)? {
        ProjectRef::Id(id) => client.list_memberships(id),
        ProjectRef::Code(code) => client.list_memberships_by_code(code),
    }
    .context("Failed to list memberships")?;

    output_list(&memberships, format);
    Ok(())
}

pub fn handle_statuses(client: &RedmineClient, format: OutputFormat) -> Result<()> {
    let statuses = client
        .list_issue_statuses()
        .context("Failed to list issue statuses")?;
    output_list(&statuses, format);
    Ok(())
}

pub fn handle_trackers(client: &RedmineClient, format: OutputFormat) -> Result<()> {
    let trackers = client.list_trackers().context("Failed to list trackers")?;
    output_list(&trackers, format);
    Ok(())
}

pub fn handle_enumeration(
    client: &RedmineClient,
    kind: EnumKind,
    format: OutputFormat,
) -> Result<()> {
    let kind = EnumerationKind::from(kind);
    let values = client
        .list_enumerations(kind)
        .with_context(|| format!("Failed to list {}", kind.as_str()))?;
    output_list(&values, format);
    Ok(())
}
