//! Error types for the Chime timetable engine.

use thiserror::Error;

/// Main error type for Chime operations.
#[derive(Error, Debug)]
pub enum ChimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid field pattern `{field}`: {source}")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Per-event extraction errors.
///
/// Extraction failure is a data error, not a parser error: it names the field
/// whose pattern failed to match and carries the raw offending text so the
/// caller can skip the event or surface it. A single failing event must never
/// abort processing of the rest of the batch.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("summary did not match class pattern: {0:?}")]
    Summary(String),

    #[error("description did not match teacher/period pattern: {0:?}")]
    Description(String),

    #[error("location did not match room pattern: {0:?}")]
    Location(String),

    #[error("event has no {0} field")]
    MissingField(&'static str),

    #[error("event has no start or end instant")]
    MissingInstant,
}

impl ExtractionError {
    /// The name of the event field that failed to extract.
    pub fn field(&self) -> &'static str {
        match self {
            ExtractionError::Summary(_) => "summary",
            ExtractionError::Description(_) => "description",
            ExtractionError::Location(_) => "location",
            ExtractionError::MissingField(field) => field,
            ExtractionError::MissingInstant => "start/end",
        }
    }
}

/// Result type alias for Chime operations.
pub type Result<T> = std::result::Result<T, ChimeError>;
