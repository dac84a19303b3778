//! Calendar text parsing.
//!
//! This module turns raw line-oriented calendar export text (a simplified
//! iCalendar subset) into typed [`CalendarEvent`] records. It knows nothing
//! about timetable semantics; everything downstream operates on the typed
//! records it produces.
//!
//! ```text
//! raw text ──▶ CalendarTextParser ──▶ Vec<CalendarEvent>
//! ```

pub mod parser;
pub mod types;

pub use parser::{CalendarTextParser, DEFAULT_UTC_OFFSET_MINUTES};
pub use types::{BlockKind, CalendarEvent};
