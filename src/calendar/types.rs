//! Calendar event types produced by the calendar-text parser.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Calendar Event Types
// ============================================================================

/// Kind of block found in the calendar text.
///
/// Only `Event` blocks are retained downstream; everything else in the export
/// (`VCALENDAR` headers, `VTIMEZONE` blocks, stray lines) is ignored by the
/// parser rather than represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A `BEGIN:VEVENT` .. `END:VEVENT` block.
    #[default]
    Event,
}

/// A single parsed calendar event.
///
/// Constructed once per parse pass and immutable afterwards; the full event
/// set is owned by the application for the lifetime of one loaded file and
/// replaced wholesale on the next load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Kind of source block this record came from.
    #[serde(default)]
    pub kind: BlockKind,
    /// Start instant, if the block carried a parsable `DTSTART`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// End instant, if the block carried a parsable `DTEND`.
    ///
    /// `start <= end` is NOT guaranteed; malformed input passes through
    /// unchanged and downstream treats `start > end` as a zero/negative
    /// duration period without failing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Raw `SUMMARY` text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Raw `DESCRIPTION` text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw `LOCATION` text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CalendarEvent {
    /// Create an empty event record.
    pub fn new() -> Self {
        Self {
            kind: BlockKind::Event,
            start: None,
            end: None,
            summary: None,
            description: None,
            location: None,
        }
    }

    /// Set the start instant.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the end instant.
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the summary text.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the description text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the location text.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Get the duration of the event, when both instants are present.
    ///
    /// May be negative for records with `start > end`.
    pub fn duration(&self) -> Option<Duration> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

impl Default for CalendarEvent {
    fn default() -> Self {
        Self::new()
    }
}
