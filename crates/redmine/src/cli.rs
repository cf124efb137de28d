use clap::{ArgGroup, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use redmine_api::EnumerationKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "redmine", version, about = "Command-line client for Redmine")]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "REDMINE_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Redmine instance URL (overrides config file)
    #[arg(long, env = "REDMINE_URL", global = true)]
    pub url: Option<String>,

    /// API key (overrides config file)
    #[arg(long, env = "REDMINE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Log requests and responses to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Issue operations
    #[command(visible_alias = "i")]
    Issue {
        #[command(subcommand)]
        action: IssueCommands,
    },
    /// Project operations
    #[command(visible_alias = "p")]
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// User operations
    #[command(visible_alias = "u")]
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Full-text search across issues, wiki pages, news and more
    #[command(visible_alias = "s")]
    Search {
        /// Search terms
        query: String,
        /// Restrict the search to a project (id or identifier)
        #[arg(long, short = 'p')]
        project: Option<String>,
        /// Extra query parameter (format: KEY=VALUE, can be repeated)
        #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },
    /// Time tracking
    #[command(visible_alias = "t")]
    Time {
        #[command(subcommand)]
        action: TimeCommands,
    },
    /// Project versions (milestones)
    Version {
        #[command(subcommand)]
        action: VersionCommands,
    },
    /// Project memberships
    Membership {
        #[command(subcommand)]
        action: MembershipCommands,
    },
    /// Issue statuses
    Status {
        #[command(subcommand)]
        action: ListCommands,
    },
    /// Issue trackers
    Tracker {
        #[command(subcommand)]
        action: ListCommands,
    },
    /// List an enumeration (priorities, time entry activities, document categories)
    Enum {
        #[arg(value_enum)]
        kind: EnumKind,
    },
    /// Local configuration
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "redmine", &mut std::io::stdout());
    }
}

#[derive(Subcommand, Debug)]
pub enum IssueCommands {
    /// Get issue by ID, with journals and attachments
    #[command(visible_alias = "g")]
    Get {
        /// Issue ID (e.g., 42)
        id: u64,
        /// Print a Markdown announcement linking to the issue instead
        #[arg(long)]
        message: bool,
    },
    /// List issues
    #[command(visible_alias = "ls")]
    List {
        /// Project ID or identifier (uses default_project from config if not specified)
        #[arg(long, short = 'p')]
        project: Option<String>,
        /// Status ID, or one of open, closed, *
        #[arg(long, short = 's')]
        status: Option<String>,
        /// Only issues assigned to me
        #[arg(long)]
        mine: bool,
        /// Extra query parameter (format: KEY=VALUE, can be repeated)
        #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },
    /// Create new issue
    #[command(visible_alias = "new", visible_alias = "c")]
    Create {
        /// Project ID or identifier (uses default_project from config if not specified)
        #[arg(long, short = 'p')]
        project: Option<String>,
        /// Issue subject
        #[arg(long, short = 's')]
        subject: String,
        /// Issue description
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// Tracker ID
        #[arg(long)]
        tracker: Option<u64>,
        /// Assignee user ID
        #[arg(long)]
        assignee: Option<u64>,
        /// Priority ID (see 'redmine enum issue-priorities')
        #[arg(long)]
        priority: Option<u64>,
    },
    /// Update existing issue
    #[command(visible_alias = "u", group(
        ArgGroup::new("update_fields")
            .args(["subject", "status", "notes", "done_ratio", "assignee"])
            .required(true)
            .multiple(true)
    ))]
    Update {
        /// Issue ID
        id: u64,
        /// New subject
        #[arg(long, short = 's')]
        subject: Option<String>,
        /// New status ID
        #[arg(long)]
        status: Option<u64>,
        /// Note to add to the issue history
        #[arg(long, short = 'n')]
        notes: Option<String>,
        /// Percentage done (0-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
        done_ratio: Option<u32>,
        /// New assignee user ID
        #[arg(long)]
        assignee: Option<u64>,
    },
    /// Delete issue
    Delete {
        /// Issue ID
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List all visible projects
    #[command(visible_alias = "ls")]
    List,
    /// Get project by ID or identifier
    #[command(visible_alias = "g")]
    Get {
        /// Project ID or identifier
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show the user owning the API key
    Me,
    /// Get user by ID
    #[command(visible_alias = "g")]
    Get {
        /// User ID
        id: u64,
    },
    /// List users (requires admin privileges)
    #[command(visible_alias = "ls")]
    List {
        /// Extra query parameter (format: KEY=VALUE, can be repeated)
        #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TimeCommands {
    /// List time entries
    #[command(visible_alias = "ls")]
    List {
        /// Project ID or identifier
        #[arg(long, short = 'p')]
        project: Option<String>,
        /// Extra query parameter (format: KEY=VALUE, can be repeated)
        #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },
    /// Log time on an issue
    Log {
        /// Issue ID
        #[arg(long, short = 'i')]
        issue: u64,
        /// Hours spent
        #[arg(long)]
        hours: f64,
        /// Activity ID (see 'redmine enum time-entry-activities')
        #[arg(long, short = 'a')]
        activity: Option<u64>,
        /// Comment
        #[arg(long, short = 'c')]
        comments: Option<String>,
        /// Date the time was spent (YYYY-MM-DD, defaults to today on the server)
        #[arg(long, value_name = "YYYY-MM-DD")]
        spent_on: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum VersionCommands {
    /// List versions of a project
    #[command(visible_alias = "ls")]
    List {
        /// Project ID or identifier (uses default_project from config if not specified)
        #[arg(long, short = 'p')]
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MembershipCommands {
    /// List members of a project
    #[command(visible_alias = "ls")]
    List {
        /// Project ID or identifier (uses default_project from config if not specified)
        #[arg(long, short = 'p')]
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// List all
    #[command(visible_alias = "ls")]
    List,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum EnumKind {
    IssuePriorities,
    TimeEntryActivities,
    DocumentCategories,
}

impl From<EnumKind> for EnumerationKind {
    fn from(kind: EnumKind) -> Self {
        match kind {
            EnumKind::IssuePriorities => EnumerationKind::IssuePriorities,
            EnumKind::TimeEntryActivities => EnumerationKind::TimeEntryActivities,
            EnumKind::DocumentCategories => EnumerationKind::DocumentCategories,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (API key masked)
    Show,
    /// List the config file search paths, highest precedence last
    Path,
}
