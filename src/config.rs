use crate::calendar::CalendarMode;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Engine parameters for one parse-and-resolve run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanConfig {
    /// Date literal pattern, overridden by a `dateFormat` directive.
    pub date_format: String,
    pub calendar_mode: CalendarMode,
    pub default_duration_days: u32,
    /// Let explicit start dates win over dependency-derived ones (with a warning).
    pub allow_schedule_override: bool,
    /// Start of tasks without dependencies or dates. `None` means today.
    pub project_start: Option<NaiveDate>,
    pub comment_marker: String,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            date_format: "YYYY-MM-DD".to_string(),
            calendar_mode: CalendarMode::CalendarDay,
            default_duration_days: 1,
            allow_schedule_override: false,
            project_start: None,
            comment_marker: "%%".to_string(),
        }
    }
}

impl PlanConfig {
    pub fn with_project_start(mut self, date: NaiveDate) -> Self {
        self.project_start = Some(date);
        self
    }

    pub fn with_calendar_mode(mut self, mode: CalendarMode) -> Self {
        self.calendar_mode = mode;
        self
    }

    pub fn with_schedule_override(mut self, allow: bool) -> Self {
        self.allow_schedule_override = allow;
        self
    }

    pub fn with_default_duration(mut self, days: u32) -> Self {
        self.default_duration_days = days;
        self
    }

    pub fn resolved_project_start(&self) -> NaiveDate {
        self.project_start
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_duration_days == 0 {
            return Err(ConfigError::Invalid(
                "default_duration_days must be at least 1".into(),
            ));
        }
        if self.comment_marker.trim().is_empty() {
            return Err(ConfigError::Invalid("comment_marker must not be empty".into()));
        }
        crate::dsl::DateFormat::from_pattern(&self.date_format).map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: PlanConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlanConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    PlanConfig::from_toml_str(&contents)
}
