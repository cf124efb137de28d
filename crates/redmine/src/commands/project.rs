use super::ProjectRef;
use crate::cli::{OutputFormat, ProjectCommands};
use crate::output::{output_list, output_result};
use anyhow::{Context, Result};
use redmine_api::RedmineClient;

pub fn handle_project(
    client: &RedmineClient,
    action: &ProjectCommands,
    format: OutputFormat,
) -> Result<()> {
    match action {
        ProjectCommands::List => handle_list(client, format),
        ProjectCommands::Get { id } => handle_get(client, id, format),
    }
}

fn handle_list(client: &RedmineClient, format: OutputFormat) -> Result<()> {
    let projects = client
        .list_projects(&[])
        .context("Failed to list projects")?;

    output_list(&projects, format);
    Ok(())
}

fn handle_get(client: &RedmineClient, id: &str, format: OutputFormat) -> Result<()> {
    let project = match ProjectRef::parse(id) {
        ProjectRef::Id(id) => client.get_project(id),
        ProjectRef::Code(code) => client.get_project_by_code(code),
    }
    .with_context(|| format!("Failed to fetch project '{}'", id))?;

    output_result(&project, format);
    Ok(())
}
