//! Continuous clock positions over the school day.
//!
//! Pure functions of `(reference instant, day's bells)`: no I/O, no drawing.
//! Outputs are fractions in `[0, 1]` that the presentation layer turns into
//! angles or progress bars.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::bells::BellSchedule;

/// Default school-day start, minutes after local midnight (08:40).
pub const DEFAULT_DAY_START_MINUTE: u32 = 520;
/// Default school-day end, minutes after local midnight (15:06).
pub const DEFAULT_DAY_END_MINUTE: u32 = 906;
/// School-day end on the designated short day (14:30).
pub const SHORT_DAY_END_MINUTE: u32 = 870;

// ============================================================================
// Day Span
// ============================================================================

/// The convention defining the overall school-day span.
///
/// The two variants are incompatible conventions observed in the wild, so the
/// choice is configuration; a call site uses exactly one, never a hybrid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DaySpan {
    /// Fixed minutes-after-midnight bounds, independent of the bell list.
    Fixed {
        start_minute: u32,
        end_minute: u32,
    },
    /// Span derived from the first and last bell of the day; falls back to
    /// the fixed defaults when the day has no bells.
    FromBells,
}

impl DaySpan {
    /// The standard fixed span, 08:40 to 15:06.
    pub fn standard() -> Self {
        DaySpan::Fixed {
            start_minute: DEFAULT_DAY_START_MINUTE,
            end_minute: DEFAULT_DAY_END_MINUTE,
        }
    }

    /// The short-day fixed span, 08:40 to 14:30.
    pub fn short_day() -> Self {
        DaySpan::Fixed {
            start_minute: DEFAULT_DAY_START_MINUTE,
            end_minute: SHORT_DAY_END_MINUTE,
        }
    }
}

impl Default for DaySpan {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Clock Mapper
// ============================================================================

/// Maps a reference instant onto day-relative and period-relative fractions.
#[derive(Debug, Clone, Copy)]
pub struct ClockMapper {
    span: DaySpan,
    /// Offset used to compute minutes since local midnight.
    offset: FixedOffset,
}

impl ClockMapper {
    /// Create a mapper with the given day-span convention and local offset.
    pub fn new(span: DaySpan, offset: FixedOffset) -> Self {
        Self { span, offset }
    }

    /// The configured day-span convention.
    pub fn span(&self) -> DaySpan {
        self.span
    }

    /// Map the reference instant linearly onto the school-day span as a
    /// fraction in `[0, 1]`, clamped outside the span.
    ///
    /// A degenerate span (end at or before start) yields `0.0`.
    pub fn day_position(&self, reference: DateTime<Utc>, bells: &BellSchedule) -> f64 {
        let (start, end) = self.span_minutes(bells);
        if end <= start {
            return 0.0;
        }
        let minute = self.minutes_since_local_midnight(reference);
        ((minute - start) / (end - start)).clamp(0.0, 1.0)
    }

    /// Fractional position of the reference instant within the current
    /// period, i.e. between the previous bell (at or before the reference)
    /// and the next bell (strictly after it).
    ///
    /// Before the first bell of the day this clamps to `0.0`; after the last
    /// bell, to `1.0`. Both clamps are part of the contract: the result is
    /// always a defined number, never NaN. At a bell instant the result is
    /// exactly `0.0` (a new period has just begun), and exactly `1.0` at the
    /// final bell of the day.
    pub fn period_position(&self, reference: DateTime<Utc>, bells: &BellSchedule) -> f64 {
        let Some(previous) = bells.previous_bell(reference) else {
            return 0.0;
        };
        let Some(next) = bells.next_bell(reference) else {
            return 1.0;
        };
        let elapsed = (reference - previous).num_milliseconds() as f64;
        let span = (next - previous).num_milliseconds() as f64;
        (elapsed / span).clamp(0.0, 1.0)
    }

    /// Resolve the span bounds in minutes after local midnight.
    fn span_minutes(&self, bells: &BellSchedule) -> (f64, f64) {
        match self.span {
            DaySpan::Fixed {
                start_minute,
                end_minute,
            } => (f64::from(start_minute), f64::from(end_minute)),
            DaySpan::FromBells => match (bells.first(), bells.last()) {
                (Some(first), Some(last)) => (
                    self.minutes_since_local_midnight(first),
                    self.minutes_since_local_midnight(last),
                ),
                _ => (
                    f64::from(DEFAULT_DAY_START_MINUTE),
                    f64::from(DEFAULT_DAY_END_MINUTE),
                ),
            },
        }
    }

    fn minutes_since_local_midnight(&self, instant: DateTime<Utc>) -> f64 {
        let local = instant.with_timezone(&self.offset);
        f64::from(local.time().num_seconds_from_midnight()) / 60.0
    }
}

// ============================================================================
// Tests
// ============================================================================
