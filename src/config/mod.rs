use crate::core::grader::ScoringPolicy;
use crate::errors::{AppError, AppResult};
use crate::utils::time::{TimestampFormat, parse_utc_offset, validate_pattern};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod keys; // missing-key detection and backfill for config files

pub const DEFAULT_START_EVENT: &str = "000_lab_start";
pub const DEFAULT_FINISH_EVENT: &str = "100_lab_finish";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTypes {
    #[serde(default = "default_start_event")]
    pub start: String,
    #[serde(default = "default_finish_event")]
    pub finish: String,
}

fn default_start_event() -> String {
    DEFAULT_START_EVENT.to_string()
}
fn default_finish_event() -> String {
    DEFAULT_FINISH_EVENT.to_string()
}

impl Default for EventTypes {
    fn default() -> Self {
        Self {
            start: default_start_event(),
            finish: default_finish_event(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Display {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}
fn default_utc_offset() -> String {
    "+00:00".to_string()
}

impl Default for Display {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            utc_offset: default_utc_offset(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub migrations_dir: Option<String>,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default)]
    pub events: EventTypes,
    #[serde(default)]
    pub scoring: ScoringPolicy,
    #[serde(default)]
    pub display: Display,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_query_timeout_ms() -> u64 {
    5_000
}
fn default_busy_timeout_ms() -> u64 {
    2_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            migrations_dir: None,
            query_timeout_ms: default_query_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
            events: EventTypes::default(),
            scoring: ScoringPolicy::default(),
            display: Display::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.labgrade`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".labgrade")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("labgrade.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("labgrade.sqlite")
    }

    /// Resolve a `--db` value: `~` is expanded and relative names live
    /// in the config directory.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = crate::utils::path::expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Load configuration from `path` (or the default file), falling back
    /// to defaults when the file does not exist.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let default_path = Self::config_file();
        let path = path.unwrap_or(&default_path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let cfg = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        // an empty file deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the grader or the renderer cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        let penalty = self.scoring.default_late_penalty;
        if !(penalty > 0.0 && penalty <= 1.0) {
            return Err(AppError::Config(format!(
                "scoring.default_late_penalty must be in (0, 1], got {}",
                penalty
            )));
        }

        if self.events.start.trim().is_empty() || self.events.finish.trim().is_empty() {
            return Err(AppError::Config(
                "events.start and events.finish must not be empty".into(),
            ));
        }

        if self.database.trim().is_empty() {
            return Err(AppError::Config("database path must not be empty".into()));
        }

        validate_pattern(&self.display.timestamp_format)?;
        parse_utc_offset(&self.display.utc_offset)?;
        Ok(())
    }

    pub fn timestamp_format(&self) -> AppResult<TimestampFormat> {
        TimestampFormat::new(&self.display.timestamp_format, &self.display.utc_offset)
    }

    pub fn migrations_dir(&self) -> Option<PathBuf> {
        self.migrations_dir
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(crate::utils::path::expand_tilde)
    }

    /// Initialize configuration file and database location.
    ///
    /// `custom_db` relative paths resolve inside the config directory.
    /// In test mode the config file is left untouched.
    pub fn init_all(
        config_path: Option<&Path>,
        custom_db: Option<&str>,
        is_test: bool,
    ) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(name),
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let default_path = Self::config_file();
            let target = config_path.unwrap_or(&default_path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, config.to_yaml()?)?;
            tracing::info!(path = %target.display(), "configuration written");
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
