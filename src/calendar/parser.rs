//! Tolerant line-oriented parser for calendar export text.
//!
//! This handles the simplified iCalendar subset produced by school timetable
//! exports: `BEGIN:VEVENT`/`END:VEVENT` delimited blocks of
//! `NAME[;PARAM=VALUE]:VALUE` property lines. Malformed input degrades by
//! omission, never by failure: unknown properties are ignored, lines without
//! a `:` are skipped, unbalanced blocks yield whatever closed cleanly.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use super::types::CalendarEvent;

/// Block delimiters.
const BLOCK_BEGIN: &str = "BEGIN:VEVENT";
const BLOCK_END: &str = "END:VEVENT";

/// Value-type parameter marking a bare local date-time value.
const DATE_TIME_SUFFIX: &str = ";VALUE=DATE-TIME";

/// Bare date-time format: YYYYMMDDTHHMMSS.
const DATE_TIME_FMT: &str = "%Y%m%dT%H%M%S";

/// Default export timezone: Australian Eastern Standard Time, UTC+10.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 600;

// ============================================================================
// Calendar Text Parser
// ============================================================================

/// Parser for calendar export text.
///
/// The fixed UTC offset is injected rather than hard-wired so the same parser
/// serves exports from other timezones.
#[derive(Debug, Clone)]
pub struct CalendarTextParser {
    /// Offset applied to bare local date-time values.
    offset: FixedOffset,
}

impl Default for CalendarTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarTextParser {
    /// Create a parser with the default AEST (UTC+10) offset.
    pub fn new() -> Self {
        Self::with_offset_minutes(DEFAULT_UTC_OFFSET_MINUTES)
    }

    /// Create a parser with a specific fixed UTC offset in minutes.
    ///
    /// Offsets outside the valid chrono range fall back to UTC.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let offset =
            FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Self { offset }
    }

    /// The fixed offset this parser applies to bare date-time values.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parse calendar export text into event records, in source order.
    ///
    /// An unterminated trailing block is dropped; a `END:VEVENT` with no open
    /// block is ignored; lines outside any block pass through harmlessly.
    pub fn parse(&self, text: &str) -> Vec<CalendarEvent> {
        let mut events = Vec::new();
        let mut current: Option<CalendarEvent> = None;

        for raw_line in text.split('\n') {
            let line = raw_line.trim();
            if line == BLOCK_BEGIN {
                current = Some(CalendarEvent::new());
            } else if line == BLOCK_END {
                if let Some(event) = current.take() {
                    events.push(event);
                }
            } else if let Some(event) = current.as_mut() {
                self.apply_property_line(event, line);
            }
        }

        tracing::debug!(events = events.len(), "parsed calendar text");
        events
    }

    /// Apply one `NAME[;PARAM=VALUE]:VALUE` line to the open accumulator.
    ///
    /// Lines with no `:` are skipped. Unrecognized property names are ignored
    /// for forward compatibility.
    fn apply_property_line(&self, event: &mut CalendarEvent, line: &str) {
        let Some((name, value)) = line.split_once(':') else {
            return;
        };
        let name = name.trim();
        let value = value.trim();

        let (base_name, instant) = if let Some(base) = name.strip_suffix(DATE_TIME_SUFFIX) {
            (base, self.parse_local_date_time(value))
        } else {
            (name, parse_generic_date_time(value))
        };

        match base_name {
            "DTSTART" => event.start = instant,
            "DTEND" => event.end = instant,
            "SUMMARY" => event.summary = Some(unescape_text(value)),
            "DESCRIPTION" => event.description = Some(unescape_text(value)),
            "LOCATION" => event.location = Some(unescape_text(value)),
            _ => {}
        }
    }

    /// Parse a bare `YYYYMMDDTHHMMSS` value as a wall-clock time in the
    /// parser's fixed offset.
    fn parse_local_date_time(&self, value: &str) -> Option<DateTime<Utc>> {
        let naive = NaiveDateTime::parse_from_str(value, DATE_TIME_FMT).ok()?;
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Parse a generic ISO-8601 / RFC 3339 date-time string.
fn parse_generic_date_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Undo iCalendar text escaping (`\n`, `\,`, `\;`, `\\`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
