//! Timetable and bell-schedule engine.
//!
//! Everything here operates on the typed [`CalendarEvent`](crate::calendar::CalendarEvent)
//! records produced by the calendar parser:
//!
//! ```text
//! events ──▶ TimetableView (day/week buckets)
//!               │
//!               ├─▶ ClassFieldExtractor (per-event class data, lazy)
//!               │
//!               └─▶ BellSchedule (per-day boundary instants)
//!                       │
//!                       └─▶ ClockMapper (continuous day/period positions)
//! ```
//!
//! All queries take an injected reference instant so the engine never reads
//! the system clock; every operation is a total function over its inputs and
//! mutates nothing.

pub mod bells;
pub mod clock;
pub mod extract;
pub mod view;

pub use bells::{BellSchedule, PeriodSlot};
pub use clock::{
    ClockMapper, DaySpan, DEFAULT_DAY_END_MINUTE, DEFAULT_DAY_START_MINUTE, SHORT_DAY_END_MINUTE,
};
pub use extract::{ClassData, ClassFieldExtractor, FieldPatterns};
pub use view::{
    default_period_labels, iso_week_bucket, TimetableStats, TimetableView, WeekRow,
};
