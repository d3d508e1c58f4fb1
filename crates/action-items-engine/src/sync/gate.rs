use std::cell::Cell;
use std::time::{Duration, Instant};

/// How an edit notification should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The edit touched a marker line, or a line that used to be one
    Immediate,
    /// Near the start of a plain line; the user may be typing a new prefix
    LineStart,
    /// Anywhere else; a full rescan waits for the throttle window
    Throttled,
}

/// Pick a route from what is known about the edited line.
///
/// `line_start_columns` is a heuristic threshold, not a contract; see
/// [`SyncSettings::line_start_columns`](crate::settings::SyncSettings).
pub fn route(is_marker: bool, tracked: bool, column: usize, line_start_columns: usize) -> Route {
    if is_marker || tracked {
        Route::Immediate
    } else if column <= line_start_columns {
        Route::LineStart
    } else {
        Route::Throttled
    }
}

/// Minimum spacing between full rescans
#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    last: Cell<Option<Instant>>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: Cell::new(None),
        }
    }

    /// Claim the window at `now` if it has elapsed since the last claim
    pub fn try_acquire(&self, now: Instant) -> bool {
        let ready = self
            .last
            .get()
            .is_none_or(|last| now.saturating_duration_since(last) >= self.window);
        if ready {
            self.last.set(Some(now));
        }
        ready
    }

    /// Restart the window without checking it
    pub fn restart(&self, now: Instant) {
        self.last.set(Some(now));
    }

    pub fn last(&self) -> Option<Instant> {
        self.last.get()
    }
}
