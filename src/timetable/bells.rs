//! Per-day bell schedule: the ordered, distinct period-boundary instants.
//!
//! Consecutive bells delimit periods. Non-class gaps (recess, lunch) are
//! ordinary periods here because their boundaries come from ordinary events
//! in the source data; which slice is which break is caller policy, attached
//! via [`BellSchedule::labeled_periods`]. The core guarantees only ordering
//! and deduplication.

use chrono::{DateTime, Utc};

use crate::calendar::CalendarEvent;

// ============================================================================
// Bell Schedule
// ============================================================================

/// The deduplicated, ascending bell instants of one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BellSchedule {
    bells: Vec<DateTime<Utc>>,
}

impl BellSchedule {
    /// Collect every start and end instant of the given day's events,
    /// deduplicated by exact timestamp equality and sorted ascending.
    ///
    /// Zero events yield an empty schedule, which is a defined state rather
    /// than an error; all position queries handle it.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a CalendarEvent>) -> Self {
        let mut bells: Vec<DateTime<Utc>> = events
            .into_iter()
            .flat_map(|event| [event.start, event.end])
            .flatten()
            .collect();
        bells.sort_unstable();
        bells.dedup();
        Self { bells }
    }

    /// The ordered bell instants.
    pub fn bells(&self) -> &[DateTime<Utc>] {
        &self.bells
    }

    /// Number of distinct bells.
    pub fn len(&self) -> usize {
        self.bells.len()
    }

    /// Whether the day has no bells at all.
    pub fn is_empty(&self) -> bool {
        self.bells.is_empty()
    }

    /// First bell of the day.
    pub fn first(&self) -> Option<DateTime<Utc>> {
        self.bells.first().copied()
    }

    /// Last bell of the day.
    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.bells.last().copied()
    }

    /// The most recent bell at or before the reference instant.
    pub fn previous_bell(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.bells
            .iter()
            .rev()
            .find(|&&bell| bell <= reference)
            .copied()
    }

    /// The first bell strictly after the reference instant.
    pub fn next_bell(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.bells.iter().find(|&&bell| bell > reference).copied()
    }

    /// Consecutive bell pairs, i.e. the day's periods in order.
    pub fn periods(&self) -> impl Iterator<Item = (DateTime<Utc>, DateTime<Utc>)> + '_ {
        self.bells.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Periods with labels attached by a caller-supplied policy.
    ///
    /// The labeler sees the period index and the full bell list, so "the
    /// interval after the 2nd bell is recess" style conventions live with the
    /// caller instead of being a core invariant.
    pub fn labeled_periods<F>(&self, labeler: F) -> Vec<PeriodSlot>
    where
        F: Fn(usize, &[DateTime<Utc>]) -> Option<String>,
    {
        self.periods()
            .enumerate()
            .map(|(index, (start, end))| PeriodSlot {
                index,
                start,
                end,
                label: labeler(index, &self.bells),
            })
            .collect()
    }
}

/// One interval between consecutive bells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSlot {
    /// Position of this period within the day, starting at 0.
    pub index: usize,
    /// Opening bell.
    pub start: DateTime<Utc>,
    /// Closing bell.
    pub end: DateTime<Utc>,
    /// Caller-assigned label, if any.
    pub label: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
