use super::{parse_filters, ProjectRef};
use crate::cli::OutputFormat;
use crate::output::output_list;
use anyhow::{Context, Result};
use redmine_api::RedmineClient;

pub fn handle_search(
    client: &RedmineClient,
    query: &str,
    project: Option<&str>,
    filters: &[String],
    format: OutputFormat,
) -> Result<()> {
    let filters = parse_filters(filters)?;
    let results = match project.map(ProjectRef::parse) {
        None => client.search(query, &filters),
        Some(ProjectRef::Id(id)) => client.search_by_project(id, query, &filters),
        Some(ProjectRef::Code(code)) => client.search_by_project_code(code, query, &filters),
    }
    .with_context(|| format!("Search for '{}' failed", query))?;

    output_list(&results, format);
    Ok(())
}
