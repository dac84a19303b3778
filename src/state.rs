//! Caller-owned application state and the wall-clock injection seam.
//!
//! The core components hold no persistent state between calls; the only
//! shared mutable state is here: the loaded event set (replaced wholesale on
//! every load, never mutated in place) and the user-adjustable time offset
//! (read, never written, by the core).

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::error::Result;

// ============================================================================
// Clock
// ============================================================================

/// Provider of the current wall-clock instant.
///
/// The reference instant must be injectable rather than hard-wired to the
/// system clock, both for deterministic tests and for the user-adjustable
/// time offset.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant, for tests and `--at` overrides.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Which structured view the user last selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// No file loaded yet.
    #[default]
    None,
    /// Today's class table.
    Today,
    /// The week timetable grid.
    Week,
    /// The continuous clock view.
    Clock,
}

/// Serialized snapshot of the last-parsed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The full parsed event set.
    pub events: Vec<CalendarEvent>,
    /// Last-loaded filename, for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Last-used view mode.
    #[serde(default)]
    pub mode: ViewMode,
}

/// Caller-owned application state passed into query functions.
#[derive(Debug, Clone)]
pub struct AppState {
    events: Arc<Vec<CalendarEvent>>,
    filename: Option<String>,
    mode: ViewMode,
    clock_offset: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            events: Arc::new(Vec::new()),
            filename: None,
            mode: ViewMode::default(),
            clock_offset: Duration::zero(),
        }
    }
}

impl AppState {
    /// Fresh state with no events loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current event set. Readers hold an `Arc`, so a concurrent
    /// [`replace_events`](Self::replace_events) never exposes a partially
    /// written array: they see either the old complete set or the new one.
    pub fn events(&self) -> Arc<Vec<CalendarEvent>> {
        Arc::clone(&self.events)
    }

    /// Replace the event set wholesale, as on a new file load.
    pub fn replace_events(&mut self, events: Vec<CalendarEvent>, filename: Option<String>) {
        tracing::info!(
            events = events.len(),
            filename = filename.as_deref().unwrap_or("<none>"),
            "replacing loaded event set"
        );
        self.events = Arc::new(events);
        self.filename = filename;
    }

    /// Last-loaded filename.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Current view mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Select a view mode.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// The user-adjustable offset added to the true wall clock.
    pub fn clock_offset(&self) -> Duration {
        self.clock_offset
    }

    /// Set the user-adjustable clock offset.
    pub fn set_clock_offset(&mut self, offset: Duration) {
        self.clock_offset = offset;
    }

    /// The reference instant all queries are evaluated against: the injected
    /// clock's now, shifted by the user offset.
    pub fn reference_instant(&self, clock: &dyn Clock) -> DateTime<Utc> {
        clock.now() + self.clock_offset
    }

    /// Capture the persistable parts of the state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            events: self.events.as_ref().clone(),
            filename: self.filename.clone(),
            mode: self.mode,
        }
    }

    /// Restore state from a snapshot.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.events = Arc::new(snapshot.events);
        self.filename = snapshot.filename;
        self.mode = snapshot.mode;
    }

    /// Persist a snapshot as JSON.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(&self.snapshot())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously saved snapshot.
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
