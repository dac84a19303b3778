//! Day and week bucketing over the full event set.
//!
//! All queries are parameterized by a caller-supplied reference instant so
//! the engine never reads the system clock itself; see [`crate::state::Clock`]
//! for the injection seam.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::timetable::bells::BellSchedule;
use crate::timetable::extract::ClassFieldExtractor;

// ============================================================================
// ISO Week Bucketing
// ============================================================================

/// Compute the ISO week bucket (week-year, week number) of a civil date.
///
/// Uses the Thursday-shift rule: move the date to the Thursday of its week
/// (Sunday counting as weekday 7), take that Thursday's calendar year as the
/// week-year, and number the week from the days elapsed since January 1 of
/// that year. Two instants share a bucket iff both components are equal,
/// which stays correct across week and year boundaries.
pub fn iso_week_bucket(date: NaiveDate) -> (i32, u32) {
    let weekday = i64::from(date.weekday().number_from_monday());
    let thursday = date + Duration::days(4 - weekday);
    // Jan 1 of the Thursday's year always exists.
    let year_start = NaiveDate::from_ymd_opt(thursday.year(), 1, 1).unwrap();
    let days_since_year_start = (thursday - year_start).num_days();
    (thursday.year(), ((days_since_year_start + 7) / 7) as u32)
}

// ============================================================================
// Timetable View
// ============================================================================

/// Query surface for day and week buckets over the full event set.
///
/// Holds only the fixed local offset used to translate instants into civil
/// dates; it keeps no state between calls and never mutates its inputs.
#[derive(Debug, Clone, Copy)]
pub struct TimetableView {
    offset: FixedOffset,
}

impl TimetableView {
    /// Create a view for the given local offset.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// The civil calendar date of an instant in the view's local offset.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Events whose start falls on the same local calendar date as the
    /// reference instant, in source order. Events with no start are excluded.
    pub fn events_on_day<'a>(
        &self,
        events: &'a [CalendarEvent],
        reference: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a CalendarEvent> + 'a {
        let view = *self;
        let day = view.local_date(reference);
        events
            .iter()
            .filter(move |event| event.start.is_some_and(|s| view.local_date(s) == day))
    }

    /// Events whose start falls in the same ISO week bucket as the reference
    /// instant, in source order.
    pub fn events_in_week<'a>(
        &self,
        events: &'a [CalendarEvent],
        reference: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a CalendarEvent> + 'a {
        let view = *self;
        let bucket = iso_week_bucket(view.local_date(reference));
        events.iter().filter(move |event| {
            event
                .start
                .is_some_and(|s| iso_week_bucket(view.local_date(s)) == bucket)
        })
    }

    /// The deduplicated, ascending bell schedule for the reference day.
    pub fn bells_on_day(
        &self,
        events: &[CalendarEvent],
        reference: DateTime<Utc>,
    ) -> BellSchedule {
        BellSchedule::from_events(self.events_on_day(events, reference))
    }

    /// Build the week timetable grid: one row per period label, holding the
    /// subjects taught in that period across the reference week.
    ///
    /// Events that fail extraction are skipped with a warning rather than
    /// aborting the rest of the grid.
    pub fn week_grid(
        &self,
        events: &[CalendarEvent],
        reference: DateTime<Utc>,
        extractor: &ClassFieldExtractor,
        period_labels: &[String],
    ) -> Vec<WeekRow> {
        let week: Vec<_> = self
            .events_in_week(events, reference)
            .filter_map(|event| match extractor.class_data(event) {
                Ok(data) => Some(data),
                Err(err) => {
                    tracing::warn!(field = err.field(), error = %err, "skipping malformed event");
                    None
                }
            })
            .collect();

        period_labels
            .iter()
            .map(|label| WeekRow {
                period: label.clone(),
                subjects: week
                    .iter()
                    .filter(|data| &data.period == label)
                    .map(|data| data.subject.clone())
                    .collect(),
            })
            .collect()
    }

    /// Summary statistics for the loaded event set at a reference instant.
    pub fn stats(&self, events: &[CalendarEvent], reference: DateTime<Utc>) -> TimetableStats {
        TimetableStats {
            total_events: events.len(),
            events_today: self.events_on_day(events, reference).count(),
            events_this_week: self.events_in_week(events, reference).count(),
            bells_today: self.bells_on_day(events, reference).len(),
        }
    }
}

/// One row of the week timetable grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRow {
    /// Period label this row covers.
    pub period: String,
    /// Subjects taught in this period across the week, in source order.
    pub subjects: Vec<String>,
}

/// The conventional eight numbered period labels.
pub fn default_period_labels() -> Vec<String> {
    (1..=8).map(|n| n.to_string()).collect()
}

/// Statistics about the loaded timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableStats {
    /// Total parsed events.
    pub total_events: usize,
    /// Events on the reference day.
    pub events_today: usize,
    /// Events in the reference ISO week.
    pub events_this_week: usize,
    /// Distinct bells on the reference day.
    pub bells_today: usize,
}

// ============================================================================
// Tests
// ============================================================================
