//! Debounced snapshotting for free-form typing.
//!
//! Typing should not create one history entry per keystroke. Each edit
//! restarts an inactivity window; once the window passes without another
//! edit, the latest text is due for a snapshot.
//!
//! Time is passed in explicitly. The debouncer never spawns a timer of its
//! own, so the owner decides when to poll and the whole thing stays
//! synchronous and deterministic under test.

use std::time::{Duration, Instant};

/// Inactivity window used when none is configured.
pub const DEFAULT_SNAPSHOT_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone)]
struct Pending {
    text: String,
    deadline: Instant,
}

/// Holds the most recent uncommitted text and its deadline.
#[derive(Debug, Clone)]
pub struct SnapshotDebouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl SnapshotDebouncer {
    /// Creates a debouncer with the given inactivity window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Records an edit, restarting the window.
    pub fn schedule(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            text: text.into(),
            deadline: now + self.delay,
        });
    }

    /// Returns the pending text once its window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due { self.flush() } else { None }
    }

    /// Returns the pending text immediately, if any.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.text)
    }

    /// Drops the pending text without committing it.
    ///
    /// Must be called when the note changes or the session ends, or a
    /// stale snapshot would land in the wrong history.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::trace!("pending snapshot cancelled");
        }
    }

    /// Returns true if an edit is waiting for its window to pass.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending edit becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// The configured inactivity window.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SnapshotDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_DELAY)
    }
}
