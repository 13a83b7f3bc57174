//! Runtime configuration: CLI flags layered over an optional user TOML file.
//!
//! The user file lives at `~/.config/recipient-strip/config.toml` (or under
//! `RECIPIENT_STRIP_CONFIG_DIR`). CLI flags always win over file values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::measure::DEFAULT_SPACING;
use crate::resize::ResizeDelivery;

const CONFIG_FILE: &str = "config.toml";
pub const CONFIG_DIR_ENV: &str = "RECIPIENT_STRIP_CONFIG_DIR";
pub const DEFAULT_BADGE_GAP: u16 = 1;

#[derive(Debug, Parser, Clone, Default)]
pub struct AppConfig {
    /// Write JSON trace logs (see RECIPIENT_STRIP_TRACE_LOG)
    #[arg(long = "logs", default_value_t = false)]
    pub logs: bool,

    /// Disable all logging, even when --logs is set
    #[arg(long = "no-logs", default_value_t = false)]
    pub no_logs: bool,

    /// Columns added to each recipient for the separator (overrides config file)
    #[arg(long = "spacing")]
    pub spacing: Option<usize>,

    /// Recompute once per burst of resize events instead of once per event
    #[arg(long = "conflate-resize", default_value_t = false)]
    pub conflate_resize: bool,

    /// Path to a config file (defaults to ~/.config/recipient-strip/config.toml)
    #[arg(long = "config")]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

/// Values persisted in the user config file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub spacing: Option<usize>,
    pub conflate_resize: Option<bool>,
    pub badge_gap: Option<u16>,
}

fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::config_dir().map(|dir| dir.join("recipient-strip"))
}

#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

pub fn parse_user_config(path: &Path, contents: &str) -> Result<UserConfig, ConfigError> {
    toml::from_str(contents).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Load the user config.
///
/// An explicit `path` must exist. The default location is optional: when it
/// is missing the defaults apply.
pub fn load_user_config(path: Option<&Path>) -> Result<UserConfig, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match config_file_path() {
            Some(path) => (path, false),
            None => return Ok(UserConfig::default()),
        },
    };
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no user config; using defaults");
            return Ok(UserConfig::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    parse_user_config(&path, &contents)
}

/// Effective settings for a strip after layering CLI over file over defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripSettings {
    pub spacing: usize,
    pub badge_gap: u16,
    pub delivery: ResizeDelivery,
}

impl Default for StripSettings {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            badge_gap: DEFAULT_BADGE_GAP,
            delivery: ResizeDelivery::EveryEvent,
        }
    }
}

impl StripSettings {
    #[must_use]
    pub fn resolve(app: &AppConfig, user: &UserConfig) -> Self {
        let conflate = app.conflate_resize || user.conflate_resize.unwrap_or(false);
        Self {
            spacing: app.spacing.or(user.spacing).unwrap_or(DEFAULT_SPACING),
            badge_gap: user.badge_gap.unwrap_or(DEFAULT_BADGE_GAP),
            delivery: ResizeDelivery::from_conflate_flag(conflate),
        }
    }
}
