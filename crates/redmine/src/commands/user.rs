use super::parse_filters;
use crate::cli::{OutputFormat, UserCommands};
use crate::output::{output_list, output_result};
use anyhow::{Context, Result};
use redmine_api::RedmineClient;

pub fn handle_user(
    client: &RedmineClient,
    action: &UserCommands,
    format: OutputFormat,
) -> Result<()> {
    match action {
        UserCommands::Me => {
            let user = client
                .get_current_user()
                .context("Failed to fetch current user")?;
            output_result(&user, format);
        }
        UserCommands::Get { id } => {
            let user = client
                .get_user(*id)
                .with_context(|| format!("Failed to fetch user {}", id))?;
            output_result(&user, format);
        }
        UserCommands::List { filters } => {
            let users = client
                .list_users(&parse_filters(filters)?)
                .context("Failed to list users")?;
            output_list(&users, format);
        }
    }
    Ok(())
}
