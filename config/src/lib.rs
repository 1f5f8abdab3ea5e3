//! Configuration loading for the phonebook.
//!
//! The config file lives at `~/.phonebook/config.toml`. Every section is
//! optional and a missing file means defaults:
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:3001/api/persons"
//!
//! [app]
//! ascii_only = false
//! high_contrast = false
//! ```
//!
//! `PHONEBOOK_API_URL` overrides `server.base_url`.

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use phonebook_types::ui::UiOptions;

/// Collection used when neither config nor environment names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api/persons";

/// Environment variable that overrides the configured base URL.
pub const API_URL_ENV: &str = "PHONEBOOK_API_URL";

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "PHONEBOOK_LOG";

#[derive(Debug, Default, Deserialize)]
pub struct PhonebookConfig {
    pub server: Option<ServerConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the persons collection. Supports `${VAR}` expansion.
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for markers and borders.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl PhonebookConfig {
    /// Load from the default location. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            })
            .unwrap_or_default()
    }
}

/// Resolve the collection URL: environment, then config file, then default.
#[must_use]
pub fn resolve_base_url(config: Option<&PhonebookConfig>) -> String {
    resolve_base_url_with(config, |name| env::var(name).ok())
}

fn resolve_base_url_with<F>(config: Option<&PhonebookConfig>, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("Base URL taken from {API_URL_ENV}");
        return url.trim().to_string();
    }

    config
        .and_then(|cfg| cfg.server.as_ref())
        .and_then(|server| server.base_url.as_deref())
        .map(|raw| expand_env_vars_with(raw, &lookup))
        .filter(|url| !url.trim().is_empty())
        .map_or_else(|| DEFAULT_BASE_URL.to_string(), |url| url.trim().to_string())
}

/// Replace `${VAR}` references with looked-up values (unset → empty).
fn expand_env_vars_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + len];
        if !var.is_empty() {
            out.push_str(&lookup(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + len + 1..];
    }

    out.push_str(rest);
    out
}

/// `~/.phonebook`, home of the config file and logs.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".phonebook"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
