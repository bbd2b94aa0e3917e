//! Console configuration.
//!
//! # Responsibility
//! - Describe logging, board column and calendar week settings.
//! - Load settings from JSON, with every field defaulted.
//!
//! # Invariants
//! - A config returned by `from_json_str`/`from_path`/`load` has passed
//!   `validate()`.
//! - Missing fields fall back to defaults; unknown fields are rejected.

use crate::logging::{default_log_level, normalize_level};
use crate::model::task::TaskStatus;
use chrono::{Datelike, Days, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file for `ConsoleConfig::load`.
pub const CONFIG_PATH_ENV: &str = "OPSCONSOLE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("board must have at least one column")]
    NoColumns,
    #[error("board column `{0}` is listed more than once")]
    DuplicateColumn(&'static str),
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    InvalidLogLevel(String),
    #[error("log dir must be an absolute path, got `{0}`")]
    RelativeLogDir(PathBuf),
}

/// Top-level console settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    pub logging: LoggingConfig,
    pub board: BoardConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Columns shown by the task board, left to right.
    pub columns: Vec<TaskStatus>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: TaskStatus::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    pub week_start: WeekStart,
}

/// First day of a calendar week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    /// First day of the week containing `date`.
    pub fn week_of(self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            Self::Monday => date.weekday().num_days_from_monday(),
            Self::Sunday => date.weekday().num_days_from_sunday(),
        };
        date.checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(date)
    }
}

impl ConsoleConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).inspect_err(|err| {
            warn!(
                "event=config_rejected module=config path={} error={}",
                path.display(),
                err
            );
        })
    }

    /// Loads the file named by `OPSCONSOLE_CONFIG`, or defaults when the
    /// variable is unset or blank.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Self::from_path(raw.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.logging.level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.logging.level.clone()))?;
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }

        if self.board.columns.is_empty() {
            return Err(ConfigError::NoColumns);
        }
        let mut seen = HashSet::new();
        for status in &self.board.columns {
            if !seen.insert(*status) {
                return Err(ConfigError::DuplicateColumn(status.as_key()));
            }
        }
        Ok(())
    }
}
