mod cli;
mod color;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, MembershipCommands, VersionCommands};
use config::Config;
use output::output_error;
use redmine_api::RedmineClient;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    color::init(cli.color);

    let format = cli.format;
    if let Err(e) = run(cli) {
        output_error(&e, format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        Cli::generate_completions(*shell);
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_with_cli(cli.url.clone(), cli.token.clone());

    // Config commands work without a reachable server
    if let Commands::Config { action } = &cli.command {
        return commands::config::handle_config(&config, action, cli.config.as_deref(), cli.format);
    }

    let (url, token) = config.credentials()?;
    let client = RedmineClient::new(url, token);
    log::debug!("using Redmine at {}", client.base_url());

    run_with_client(&client, &cli, config.default_project.as_deref())
}

fn run_with_client(client: &RedmineClient, cli: &Cli, default_project: Option<&str>) -> Result<()> {
    let format = cli.format;
    match &cli.command {
        Commands::Issue { action } => {
            commands::issue::handle_issue(client, action, format, default_project)
        }
        Commands::Project { action } => commands::project::handle_project(client, action, format),
        Commands::User { action } => commands::user::handle_user(client, action, format),
        Commands::Search {
            query,
            project,
            filters,
        } => commands::search::handle_search(client, query, project.as_deref(), filters, format),
        Commands::Time { action } => commands::time::handle_time(client, action, format),
        Commands::Version {
            action: VersionCommands::List { project },
        } => commands::reference::handle_versions(
            client,
            project.as_deref(),
            default_project,
            format,
        ),
        Commands::Membership {
            action: MembershipCommands::List { project },
        } => commands::reference::handle_memberships(
            client,
            project.as_deref(),
            default_project,
            format,
        ),
        Commands::Status { .. } => commands::reference::handle_statuses(client, format),
        Commands::Tracker { .. } => commands::reference::handle_trackers(client, format),
        Commands::Enum { kind } => commands::reference::handle_enumeration(client, *kind, format),
        // Handled in run() before a client exists
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}
