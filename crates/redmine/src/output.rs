use crate::cli::OutputFormat;
use chrono::{DateTime, Utc};
use colored::Colorize;
use redmine_api::{
    Enumeration, Issue, IssueData, IssueStatus, LinkObject, MembershipData, Project, ProjectData,
    RedmineError, SearchResult, TimeEntry, TimeEntryData, Tracker, User, UserData, VersionData,
};
use serde::Serialize;

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

pub fn output_list<T: Serialize + Displayable>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", item.display());
                println!();
            }
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

/// Machine-readable code for an error, based on the API error underneath any context.
fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<RedmineError>() {
        Some(RedmineError::Unauthorized) => "unauthorized",
        Some(RedmineError::NotFound(_)) => "not_found",
        Some(RedmineError::Api { .. }) => "api_error",
        Some(RedmineError::Http(_)) => "http_error",
        Some(RedmineError::MissingId(_)) => "invalid_input",
        Some(_) => "decode_error",
        None => "error",
    }
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: error_code(err).to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

pub trait Displayable {
    fn display(&self) -> String;
}

fn link_name(link: &Option<LinkObject>) -> String {
    match link {
        Some(link) if !link.name.is_empty() => link.name.clone(),
        Some(link) => format!("#{}", link.id),
        None => "None".to_string(),
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn id_or_none(id: Option<u64>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| "None".to_string())
}

fn colorize_status(name: &str, is_closed: bool) -> String {
    let lower = name.to_lowercase();
    if is_closed || lower == "closed" || lower == "resolved" || lower == "rejected" {
        name.green().to_string()
    } else if lower.contains("progress") || lower == "feedback" {
        name.yellow().to_string()
    } else {
        name.to_string()
    }
}

fn colorize_priority(value: &str) -> String {
    match value.to_lowercase().as_str() {
        "immediate" | "urgent" => value.red().bold().to_string(),
        "high" => value.red().to_string(),
        "low" => value.dimmed().to_string(),
        _ => value.to_string(),
    }
}

impl Displayable for IssueData {
    fn display(&self) -> String {
        let mut output = format!(
            "{} - {}\n  {}: {}\n  {}: {} / {}\n  {}: {}\n  {}: {}\n  {}: {}%\n  {}: {}\n  {}: {}",
            format!("#{}", self.id).cyan().bold(),
            self.subject.white().bold(),
            "Project".dimmed(),
            link_name(&self.project),
            "Tracker".dimmed(),
            link_name(&self.tracker),
            colorize_status(&link_name(&self.status), self.closed_on.is_some()),
            "Priority".dimmed(),
            colorize_priority(&link_name(&self.priority)),
            "Assignee".dimmed(),
            link_name(&self.assigned_to),
            "Done".dimmed(),
            self.done_ratio,
            "Created".dimmed(),
            timestamp(self.created_on).dimmed(),
            "Updated".dimmed(),
            timestamp(self.updated_on).dimmed()
        );

        if let Some(due) = &self.due_date {
            output.push_str(&format!("\n  {}: {}", "Due".dimmed(), due));
        }

        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n  {}: {}", "Description".dimmed(), desc));
        }

        if !self.attachments.is_empty() {
            output.push_str(&format!("\n  {}:", "Attachments".dimmed()));
            for attachment in &self.attachments {
                output.push_str(&format!(
                    "\n    {} ({} bytes)",
                    attachment.filename, attachment.filesize
                ));
            }
        }

        let notes: Vec<_> = self
            .journals
            .iter()
            .filter(|j| j.notes.as_deref().is_some_and(|n| !n.is_empty()))
            .collect();
        if !notes.is_empty() {
            output.push_str(&format!("\n  {}:", "Notes".dimmed()));
            for journal in notes {
                output.push_str(&format!(
                    "\n    [{}] {} - {}",
                    timestamp(journal.created_on).dimmed(),
                    link_name(&journal.user).cyan(),
                    journal.notes.as_deref().unwrap_or_default()
                ));
            }
        }

        output
    }
}

impl Displayable for Issue {
    fn display(&self) -> String {
        let mut output = format!(
            "{} - {}\n  {}: {}\n  {}: {}\n  {}: {}",
            format!("#{}", id_or_none(self.id)).cyan().bold(),
            self.subject.as_deref().unwrap_or_default().white().bold(),
            "Project".dimmed(),
            id_or_none(self.project),
            "Status".dimmed(),
            id_or_none(self.status),
            "Created".dimmed(),
            timestamp(self.created_on).dimmed()
        );
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n  {}: {}", "Description".dimmed(), desc));
        }
        output
    }
}

impl Displayable for ProjectData {
    fn display(&self) -> String {
        let mut output = format!(
            "{} ({}) - {}",
            self.identifier.cyan().bold(),
            self.id.to_string().dimmed(),
            self.name.white().bold()
        );
        if self.parent.is_some() {
            output.push_str(&format!("\n  {}: {}", "Parent".dimmed(), link_name(&self.parent)));
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n  {}: {}", "Description".dimmed(), desc));
        }
        output
    }
}

impl Displayable for Project {
    fn display(&self) -> String {
        let mut output = format!(
            "{} ({}) - {}",
            self.identifier.as_deref().unwrap_or_default().cyan().bold(),
            id_or_none(self.id).dimmed(),
            self.name.as_deref().unwrap_or_default().white().bold()
        );
        if let Some(homepage) = self.homepage.as_deref().filter(|h| !h.is_empty()) {
            output.push_str(&format!("\n  {}: {}", "Homepage".dimmed(), homepage));
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n  {}: {}", "Description".dimmed(), desc));
        }
        output
    }
}

impl Displayable for User {
    fn display(&self) -> String {
        let mut output = format!(
            "{} ({}) - {} {}",
            self.login.as_deref().unwrap_or_default().cyan().bold(),
            id_or_none(self.id).dimmed(),
            self.firstname.as_deref().unwrap_or_default(),
            self.lastname.as_deref().unwrap_or_default()
        );
        if let Some(mail) = &self.mail {
            output.push_str(&format!("\n  {}: {}", "Mail".dimmed(), mail));
        }
        if self.admin {
            output.push_str(&format!("\n  {}: {}", "Admin".dimmed(), "yes".yellow()));
        }
        output.push_str(&format!(
            "\n  {}: {}",
            "Last login".dimmed(),
            timestamp(self.last_login_on).dimmed()
        ));
        if !self.groups.is_empty() {
            let names: Vec<&str> = self.groups.iter().map(|g| g.name.as_str()).collect();
            output.push_str(&format!("\n  {}: {}", "Groups".dimmed(), names.join(", ")));
        }
        output
    }
}

impl Displayable for UserData {
    fn display(&self) -> String {
        let mut output = format!(
            "{} ({}) - {} {}",
            self.login.cyan().bold(),
            self.id.to_string().dimmed(),
            self.firstname,
            self.lastname
        );
        if let Some(mail) = &self.mail {
            output.push_str(&format!("\n  {}: {}", "Mail".dimmed(), mail));
        }
        output
    }
}

impl Displayable for SearchResult {
    fn display(&self) -> String {
        format!(
            "{} {}\n  {}",
            format!("[{}]", self.kind).magenta(),
            self.title.white().bold(),
            self.url.dimmed()
        )
    }
}

impl Displayable for TimeEntryData {
    fn display(&self) -> String {
        let mut output = format!(
            "{} {}h {} - {}",
            self.spent_on.as_deref().unwrap_or("-").dimmed(),
            format!("{:.2}", self.hours).cyan().bold(),
            link_name(&self.activity),
            link_name(&self.user)
        );
        if let Some(issue) = &self.issue {
            output.push_str(&format!("\n  {}: #{}", "Issue".dimmed(), issue.id));
        }
        if let Some(comments) = self.comments.as_deref().filter(|c| !c.is_empty()) {
            output.push_str(&format!("\n  {}: {}", "Comment".dimmed(), comments));
        }
        output
    }
}

impl Displayable for TimeEntry {
    fn display(&self) -> String {
        format!(
            "{} {} {}h on {}\n  {}: {}",
            "Logged".green(),
            format!("#{}", id_or_none(self.id)).cyan().bold(),
            self.hours.unwrap_or_default(),
            self.spent_on
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            "Issue".dimmed(),
            id_or_none(self.issue)
        )
    }
}

impl Displayable for VersionData {
    fn display(&self) -> String {
        let status = self.status.as_deref().unwrap_or("open");
        let status = if status == "closed" {
            status.green().to_string()
        } else {
            status.to_string()
        };
        let mut output = format!(
            "{} ({}) - {}",
            self.name.cyan().bold(),
            self.id.to_string().dimmed(),
            status
        );
        if let Some(due) = &self.due_date {
            output.push_str(&format!("\n  {}: {}", "Due".dimmed(), due));
        }
        output
    }
}

impl Displayable for MembershipData {
    fn display(&self) -> String {
        let member = if self.user.is_some() {
            link_name(&self.user)
        } else {
            format!("{} (group)", link_name(&self.group))
        };
        let roles: Vec<&str> = self.roles.iter().map(|r| r.name.as_str()).collect();
        format!("{}: {}", member.cyan(), roles.join(", "))
    }
}

impl Displayable for IssueStatus {
    fn display(&self) -> String {
        let closed = if self.is_closed {
            " (closed)".green().to_string()
        } else {
            String::new()
        };
        format!("{} {}{}", self.id.to_string().dimmed(), self.name, closed)
    }
}

impl Displayable for Tracker {
    fn display(&self) -> String {
        format!(
            "{} {} ({}: {})",
            self.id.to_string().dimmed(),
            self.name.white().bold(),
            "default status".dimmed(),
            link_name(&self.default_status)
        )
    }
}

impl Displayable for Enumeration {
    fn display(&self) -> String {
        let default = if self.is_default {
            " (default)".yellow().to_string()
        } else {
            String::new()
        };
        format!("{} {}{}", self.id.to_string().dimmed(), self.name, default)
    }
}
