//! Configuration settings for the Chime timetable engine.

use crate::error::{ConfigError, Result};
use crate::timetable::clock::{DaySpan, DEFAULT_DAY_END_MINUTE, DEFAULT_DAY_START_MINUTE};
use crate::timetable::extract::{
    FieldPatterns, DEFAULT_DESCRIPTION_PATTERN, DEFAULT_LOCATION_PATTERN, DEFAULT_SUMMARY_PATTERN,
};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Minutes in a day; offsets must stay within one day either side of UTC.
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub day: DayConfig,
    pub patterns: PatternConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            // Current directory
            PathBuf::from("chime.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("chime/config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".chime/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.calendar.utc_offset_minutes.abs() >= MAX_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_minutes must be within ±{MAX_OFFSET_MINUTES}"
            ))
            .into());
        }
        if let DaySpan::Fixed {
            start_minute,
            end_minute,
        } = self.day.span
        {
            if end_minute <= start_minute {
                return Err(ConfigError::Invalid(
                    "day span end_minute must be after start_minute".to_string(),
                )
                .into());
            }
        }
        // Compiling the patterns is the validation.
        self.field_patterns()?;
        Ok(())
    }

    /// The fixed local offset for parsing and display.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.calendar.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// The configured day-span convention.
    pub fn day_span(&self) -> DaySpan {
        self.day.span
    }

    /// Compile the configured extraction patterns.
    pub fn field_patterns(&self) -> Result<FieldPatterns> {
        Ok(FieldPatterns::from_patterns(
            &self.patterns.summary,
            &self.patterns.description,
            &self.patterns.location,
        )?)
    }
}

/// Calendar parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Fixed UTC offset, in minutes, applied to bare date-time values and
    /// used for all local civil-date computations. Default 600 (AEST).
    pub utc_offset_minutes: i32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: crate::calendar::DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

/// School-day span configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DayConfig {
    /// Day-span convention used by the clock mapper.
    pub span: DaySpan,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            span: DaySpan::Fixed {
                start_minute: DEFAULT_DAY_START_MINUTE,
                end_minute: DEFAULT_DAY_END_MINUTE,
            },
        }
    }
}

/// Extraction pattern configuration, one pattern string per field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub summary: String,
    pub description: String,
    pub location: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            summary: DEFAULT_SUMMARY_PATTERN.to_string(),
            description: DEFAULT_DESCRIPTION_PATTERN.to_string(),
            location: DEFAULT_LOCATION_PATTERN.to_string(),
        }
    }
}
