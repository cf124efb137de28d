use super::{parse_filters, ProjectRef};
use crate::cli::{OutputFormat, TimeCommands};
use crate::output::{output_list, output_result};
use anyhow::{Context, Result};
use redmine_api::dates::parse_date;
use redmine_api::{RedmineClient, TimeEntry};

pub fn handle_time(
    client: &RedmineClient,
    action: &TimeCommands,
    format: OutputFormat,
) -> Result<()> {
    match action {
        TimeCommands::List { project, filters } => {
            let filters = parse_filters(filters)?;
            let entries = match project.as_deref().map(ProjectRef::parse) {
                None => client.list_time_entries(&filters),
                Some(ProjectRef::Id(id)) => client.list_time_entries_by_project(id, &filters),
                Some(ProjectRef::Code(code)) => {
                    client.list_time_entries_by_project_code(code, &filters)
                }
            }
            .context("Failed to list time entries")?;

            output_list(&entries, format);
            Ok(())
        }
        TimeCommands::Log {
            issue,
            hours,
            activity,
            comments,
            spent_on,
        } => {
            let spent_on = spent_on
                .as_deref()
                .map(parse_date)
                .transpose()
                .context("Invalid --spent-on")?;
            let entry = TimeEntry {
                issue: Some(*issue),
                hours: Some(*hours),
                activity: *activity,
                comments: comments.clone(),
                spent_on,
                ..Default::default()
            };

            let entry = client
                .create_time_entry(entry)
                .with_context(|| format!("Failed to log time on issue #{}", issue))?;

            output_result(&entry, format);
            Ok(())
        }
    }
}
