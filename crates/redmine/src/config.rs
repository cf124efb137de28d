use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Redmine instance URL
    pub url: Option<String>,
    /// API key (My account > API access key)
    pub token: Option<String>,
    /// Project ID or identifier used when a command's --project is omitted
    pub default_project: Option<String>,
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(config_path) {
            if path.exists() {
                log::debug!("loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment
            .merge(Env::prefixed("REDMINE_"))
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, cli_url: Option<String>, cli_token: Option<String>) {
        if let Some(url) = cli_url {
            self.url = Some(url);
        }
        if let Some(token) = cli_token {
            self.token = Some(token);
        }
    }

    /// URL and API key, or an error naming whichever is missing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let url = self.url.as_deref().ok_or_else(|| {
            anyhow!("Redmine URL not configured. Set via --url, REDMINE_URL env var, or `url` in the config file")
        })?;
        let token = self.token.as_deref().ok_or_else(|| {
            anyhow!("Redmine API key not configured. Set via --token, REDMINE_TOKEN env var, or `token` in the config file")
        })?;
        Ok((url, token))
    }

    /// Copy safe to print: the API key keeps only its first four characters.
    pub fn masked(&self) -> Self {
        Self {
            token: self.token.as_deref().map(mask_token),
            ..self.clone()
        }
    }
}

fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

/// Config files in merge order; later files override earlier ones.
pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "redmine").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("redmine").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("redmine")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("redmine.toml"))
}
