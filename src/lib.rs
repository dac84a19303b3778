//! Chime: school timetable and bell-schedule engine.
//!
//! Ingests a line-oriented calendar export (a simplified iCalendar subset)
//! and derives a structured, queryable timetable: class periods with teacher,
//! room, subject and time bounds, day and ISO-week buckets, the per-day bell
//! schedule, and continuous clock positions for "what period is it right now"
//! queries.

pub mod calendar;
pub mod config;
pub mod error;
pub mod state;
pub mod timetable;

pub use calendar::{BlockKind, CalendarEvent, CalendarTextParser, DEFAULT_UTC_OFFSET_MINUTES};
pub use config::Config;
pub use error::{ChimeError, ConfigError, ExtractionError, Result};
pub use state::{AppState, Clock, FixedClock, Snapshot, SystemClock, ViewMode};
pub use timetable::{
    default_period_labels, iso_week_bucket, BellSchedule, ClassData, ClassFieldExtractor,
    ClockMapper, DaySpan, FieldPatterns, PeriodSlot, TimetableStats, TimetableView, WeekRow,
};
