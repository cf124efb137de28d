use crate::cli::{ConfigCommands, OutputFormat};
use crate::config::{config_paths, Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Config commands never contact the server.
pub fn handle_config(
    config: &Config,
    action: &ConfigCommands,
    explicit_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let masked = config.masked();
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&masked)?);
                }
                OutputFormat::Text => {
                    let text =
                        toml::to_string_pretty(&masked).context("Failed to render config")?;
                    if text.trim().is_empty() {
                        println!("No configuration set.");
                    } else {
                        print!("{}", text);
                    }
                }
            }
            Ok(())
        }
        ConfigCommands::Path => {
            let paths = config_paths(explicit_path);
            match format {
                OutputFormat::Json => {
                    let entries: Vec<_> = paths
                        .iter()
                        .map(|p| {
                            serde_json::json!({
                                "path": p.display().to_string(),
                                "exists": p.exists()
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                OutputFormat::Text => {
                    for path in paths {
                        let marker = if path.exists() { " (found)" } else { "" };
                        println!("{}{}", path.display(), marker);
                    }
                }
            }
            Ok(())
        }
    }
}
