//! Class field extraction from free-text event fields.
//!
//! School exports pack the interesting structure (subject, teacher, room,
//! period) into the free-text summary/description/location of each event.
//! This module pulls those fields out with positional patterns. The patterns
//! are injected rather than baked in so alternate export dialects can be
//! supported by swapping patterns instead of editing logic.

use chrono::{DateTime, FixedOffset, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::error::{ConfigError, ExtractionError};

/// Default pattern for the summary field.
///
/// Matches year-level classes (`Yr 7 Mathematics`), recess-style labels
/// (`Rec Recess`) and generic labelled classes (`6's Homeroom`); the subject
/// is the trailing free-text segment after the label.
pub const DEFAULT_SUMMARY_PATTERN: &str =
    r"^.+?: (?:(?:Yr \d+|Rec) ([^(\n]+)|(\d+'s [A-Za-z]+))";

/// Default pattern for the description field: two fixed-position lines.
pub const DEFAULT_DESCRIPTION_PATTERN: &str = r"Teacher:  (.+)\nPeriod: Period (.+)";

/// Default pattern for the location field.
pub const DEFAULT_LOCATION_PATTERN: &str = r"Room: (.+)";

/// Room sentinel used when an event carries no location.
const EMPTY_ROOM: &str = "-";

// ============================================================================
// Field Patterns
// ============================================================================

/// One compiled pattern per extracted field.
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    /// Pattern over `summary`; subject in capture group 1 or 2.
    pub summary: Regex,
    /// Pattern over `description`; teacher in group 1, period label in group 2.
    pub description: Regex,
    /// Pattern over `location`; room value in group 1.
    pub location: Regex,
}

impl FieldPatterns {
    /// Compile patterns from strings, e.g. from configuration.
    pub fn from_patterns(
        summary: &str,
        description: &str,
        location: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            summary: Regex::new(summary).map_err(|source| ConfigError::Pattern {
                field: "summary",
                source,
            })?,
            description: Regex::new(description).map_err(|source| ConfigError::Pattern {
                field: "description",
                source,
            })?,
            location: Regex::new(location).map_err(|source| ConfigError::Pattern {
                field: "location",
                source,
            })?,
        })
    }
}

impl Default for FieldPatterns {
    fn default() -> Self {
        Self::from_patterns(
            DEFAULT_SUMMARY_PATTERN,
            DEFAULT_DESCRIPTION_PATTERN,
            DEFAULT_LOCATION_PATTERN,
        )
        .unwrap()
    }
}

// ============================================================================
// Class Data
// ============================================================================

/// Structured class-period data derived on demand from one event.
///
/// A deterministic pure function of its source [`CalendarEvent`]; it has no
/// independent identity or lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassData {
    /// Subject name, e.g. `Mathematics` or `6's Homeroom`.
    pub subject: String,
    /// Teacher name, title-cased token by token.
    pub teacher: String,
    /// Room label; `-` when the event had no location, `Gym` for gymnasium
    /// rooms.
    pub room: String,
    /// Period label; not necessarily numeric (e.g. `Recess`).
    pub period: String,
    /// Start time as a 12-hour display string.
    pub start: String,
    /// End time as a 12-hour display string.
    pub end: String,
}

// ============================================================================
// Class Field Extractor
// ============================================================================

/// Extracts [`ClassData`] from an event's free-text fields.
pub struct ClassFieldExtractor {
    patterns: FieldPatterns,
    /// Offset used to render instants as local display times.
    offset: FixedOffset,
    /// Tokens to title-case within teacher names.
    word: Regex,
}

impl ClassFieldExtractor {
    /// Create an extractor with the given patterns and display offset.
    pub fn new(patterns: FieldPatterns, offset: FixedOffset) -> Self {
        Self {
            patterns,
            offset,
            word: Regex::new(r"\w\S*").unwrap(),
        }
    }

    /// Derive class data from one event.
    ///
    /// Fails per-event with the field whose pattern did not match; callers
    /// skip or surface the single record and keep processing the rest.
    pub fn class_data(&self, event: &CalendarEvent) -> Result<ClassData, ExtractionError> {
        let summary = event
            .summary
            .as_deref()
            .ok_or(ExtractionError::MissingField("summary"))?;
        let description = event
            .description
            .as_deref()
            .ok_or(ExtractionError::MissingField("description"))?;

        let subject = self.extract_subject(summary)?;
        let (teacher, period) = self.extract_teacher_and_period(description)?;
        let room = self.extract_room(event.location.as_deref())?;

        let (Some(start), Some(end)) = (event.start, event.end) else {
            return Err(ExtractionError::MissingInstant);
        };

        Ok(ClassData {
            subject,
            teacher,
            room,
            period,
            start: self.display_time(start),
            end: self.display_time(end),
        })
    }

    fn extract_subject(&self, summary: &str) -> Result<String, ExtractionError> {
        let captures = self
            .patterns
            .summary
            .captures(summary)
            .ok_or_else(|| ExtractionError::Summary(summary.to_string()))?;
        let subject = captures
            .get(1)
            .or_else(|| captures.get(2))
            .ok_or_else(|| ExtractionError::Summary(summary.to_string()))?;
        Ok(subject.as_str().trim().to_string())
    }

    fn extract_teacher_and_period(
        &self,
        description: &str,
    ) -> Result<(String, String), ExtractionError> {
        let captures = self
            .patterns
            .description
            .captures(description)
            .ok_or_else(|| ExtractionError::Description(description.to_string()))?;
        let teacher = captures
            .get(1)
            .map(|m| self.title_case(m.as_str()))
            .ok_or_else(|| ExtractionError::Description(description.to_string()))?;
        let period = captures
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .ok_or_else(|| ExtractionError::Description(description.to_string()))?;
        Ok((teacher, period))
    }

    /// Extract the room label. An absent or empty location yields the `-`
    /// sentinel; a `Gymnasium`-prefixed value is shortened to `Gym`.
    fn extract_room(&self, location: Option<&str>) -> Result<String, ExtractionError> {
        let location = match location {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(EMPTY_ROOM.to_string()),
        };
        let captures = self
            .patterns
            .location
            .captures(location)
            .ok_or_else(|| ExtractionError::Location(location.to_string()))?;
        let room = captures
            .get(1)
            .map(|m| m.as_str().trim())
            .ok_or_else(|| ExtractionError::Location(location.to_string()))?;
        if room.starts_with("Gymnasium") {
            Ok("Gym".to_string())
        } else {
            Ok(room.to_string())
        }
    }

    /// Upper-case the first character of each whitespace-separated token,
    /// lower-casing the remainder: `SMITH, J` becomes `Smith, J`.
    fn title_case(&self, name: &str) -> String {
        self.word
            .replace_all(name, |captures: &Captures| {
                let word = &captures[0];
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .into_owned()
    }

    /// Format an instant as a localized 12-hour `h:mm AM/PM` string.
    ///
    /// Some 12-hour formatters render midnight/noon with a leading `0:`; that
    /// prefix is normalized to `12:`.
    fn display_time(&self, instant: DateTime<Utc>) -> String {
        let local = instant.with_timezone(&self.offset);
        let formatted = local.format("%-I:%M %p").to_string();
        if let Some(rest) = formatted.strip_prefix("0:") {
            format!("12:{rest}")
        } else {
            formatted
        }
    }
}

impl Default for ClassFieldExtractor {
    fn default() -> Self {
        Self::new(
            FieldPatterns::default(),
            FixedOffset::east_opt(crate::calendar::DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap(),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event_at(hour: u32, minute: u32) -> CalendarEvent {
        // 2023-04-27 in AEST, stored as the true UTC instant.
        let offset = FixedOffset::east_opt(600 * 60).unwrap();
        let start = offset
            .with_ymd_and_hms(2023, 4, 27, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc);
        CalendarEvent::new()
            .with_start(start)
            .with_end(start + chrono::Duration::hours(1))
            .with_summary("Course: Yr 10 Mathematics")
            .with_description("Teacher:  SMITH, J\nPeriod: Period 3")
            .with_location("Room: A12")
    }

    #[test]
    fn test_extract_year_level_class() {
        let extractor = ClassFieldExtractor::default();
        let data = extractor.class_data(&event_at(8, 40)).unwrap();

        assert_eq!(data.subject, "Mathematics");
        assert_eq!(data.teacher, "Smith, J");
        assert_eq!(data.room, "A12");
        assert_eq!(data.period, "3");
        assert_eq!(data.start, "8:40 AM");
        assert_eq!(data.end, "9:40 AM");
    }

    #[test]
    fn test_extract_recess_label() {
        let extractor = ClassFieldExtractor::default();
        let mut event = event_at(10, 40);
        event.summary = Some("Course: Rec Recess".to_string());
        let data = extractor.class_data(&event).unwrap();
        assert_eq!(data.subject, "Recess");
    }

    #[test]
    fn test_extract_generic_labelled_class() {
        let extractor = ClassFieldExtractor::default();
        let mut event = event_at(9, 0);
        event.summary = Some("Course: 6's Homeroom".to_string());
        let data = extractor.class_data(&event).unwrap();
        assert_eq!(data.subject, "6's Homeroom");
    }

    #[test]
    fn test_gymnasium_room_is_shortened() {
        let extractor = ClassFieldExtractor::default();
        let mut event = event_at(11, 0);
        event.location = Some("Room: Gymnasium 2".to_string());
        let data = extractor.class_data(&event).unwrap();
        assert_eq!(data.room, "Gym");
    }

    #[test]
    fn test_empty_location_defaults_to_sentinel() {
        let extractor = ClassFieldExtractor::default();
        let mut event = event_at(11, 0);
        event.location = Some(String::new());
        assert_eq!(extractor.class_data(&event).unwrap().room, "-");

        event.location = None;
        assert_eq!(extractor.class_data(&event).unwrap().room, "-");
    }

    #[test]
    fn test_failure_names_the_field() {
        let extractor = ClassFieldExtractor::default();

        let mut event = event_at(8, 40);
        event.summary = Some("Whole School Assembly".to_string());
        let err = extractor.class_data(&event).unwrap_err();
        assert_eq!(err.field(), "summary");
        assert!(err.to_string().contains("Whole School Assembly"));

        let mut event = event_at(8, 40);
        event.description = Some("no structure here".to_string());
        let err = extractor.class_data(&event).unwrap_err();
        assert_eq!(err.field(), "description");
    }

    #[test]
    fn test_afternoon_display_time() {
        let extractor = ClassFieldExtractor::default();
        let data = extractor.class_data(&event_at(14, 6)).unwrap();
        assert_eq!(data.start, "2:06 PM");
        assert_eq!(data.end, "3:06 PM");
    }

    #[test]
    fn test_configurable_patterns() {
        let patterns = FieldPatterns::from_patterns(
            r"^Class: (.+)",
            r"Staff: (.+)\nSlot: (.+)",
            r"Venue: (.+)",
        )
        .unwrap();
        let extractor =
            ClassFieldExtractor::new(patterns, FixedOffset::east_opt(600 * 60).unwrap());

        let mut event = event_at(8, 40);
        event.summary = Some("Class: Chemistry".to_string());
        event.description = Some("Staff: jones\nSlot: 5".to_string());
        event.location = Some("Venue: Lab 3".to_string());

        let data = extractor.class_data(&event).unwrap();
        assert_eq!(data.subject, "Chemistry");
        assert_eq!(data.teacher, "Jones");
        assert_eq!(data.period, "5");
        assert_eq!(data.room, "Lab 3");
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        let err = FieldPatterns::from_patterns(r"(unclosed", DEFAULT_DESCRIPTION_PATTERN,
            DEFAULT_LOCATION_PATTERN)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { field: "summary", .. }));
    }
}
