//! Snapshot history behind undo and redo.
//!
//! ## Learning: Snapshots vs Commands
//!
//! Code editors usually record each edit as a reversible command. Notes
//! are short, so here every history entry is a full copy of the buffer:
//! - Undo and redo are just moves of a step pointer
//! - Any edit (toolbar, typing, AI rewrite) is recorded the same way
//! - No inverse operations to get wrong
//!
//! History is linear. Snapshotting while the pointer is behind the end
//! throws the redo branch away.

use std::collections::VecDeque;

/// Linear snapshot history with a step pointer.
///
/// Entries live in a `VecDeque`: new snapshots go on the back, the redo
/// branch is truncated off the back and, when a cap is set, the oldest
/// entry falls off the front once it is reached.
///
/// Invariant: `entries` is never empty and `step < entries.len()`.
#[derive(Debug, Clone)]
pub struct History {
    /// Stored snapshots, oldest first
    entries: VecDeque<String>,
    /// Index of the current snapshot
    step: usize,
    /// Maximum number of snapshots to keep; `None` keeps all of them
    max_size: Option<usize>,
}

impl History {
    /// Creates an unbounded history holding just `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_limit(initial, None)
    }

    /// Creates a history with an optional snapshot cap (at least 1).
    ///
    /// A capped history forgets its oldest snapshots, so undoing all the
    /// way back to `initial` is only guaranteed without one.
    pub fn with_limit(initial: impl Into<String>, max_size: Option<usize>) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(initial.into());
        Self {
            entries,
            step: 0,
            max_size: max_size.map(|max| max.max(1)),
        }
    }

    /// Replaces the whole history with a single entry.
    ///
    /// Called when the edited note changes identity; undo never crosses
    /// notes.
    pub fn reset(&mut self, initial: impl Into<String>) {
        self.entries.clear();
        self.entries.push_back(initial.into());
        self.step = 0;
    }

    /// Records `text` as the newest snapshot.
    ///
    /// Does nothing if `text` equals the current snapshot. Otherwise any
    /// redo entries are discarded first. Returns true if an entry was added.
    pub fn snapshot(&mut self, text: &str) -> bool {
        if self.current() == text {
            return false;
        }

        // Drop the redo branch
        self.entries.truncate(self.step + 1);
        self.entries.push_back(text.to_string());
        self.step = self.entries.len() - 1;

        if let Some(max_size) = self.max_size {
            while self.entries.len() > max_size {
                self.entries.pop_front();
                self.step -= 1;
            }
        }

        true
    }

    /// Steps back and returns the text to show.
    ///
    /// If `live` differs from the current snapshot there are edits that
    /// were never committed; the first undo only reverts those. At the
    /// start of history `live` comes back unchanged.
    pub fn undo(&mut self, live: &str) -> String {
        if live != self.current() {
            return self.current().to_string();
        }

        if self.step > 0 {
            self.step -= 1;
            self.current().to_string()
        } else {
            live.to_string()
        }
    }

    /// Steps forward and returns the text to show.
    ///
    /// At the newest snapshot `live` comes back unchanged.
    pub fn redo(&mut self, live: &str) -> String {
        if self.step + 1 < self.entries.len() {
            self.step += 1;
            self.current().to_string()
        } else {
            live.to_string()
        }
    }

    /// The snapshot the step pointer is on.
    pub fn current(&self) -> &str {
        &self.entries[self.step]
    }

    /// Returns true if `undo(live)` would change anything.
    pub fn can_undo(&self, live: &str) -> bool {
        self.step > 0 || live != self.current()
    }

    /// Returns true if there are snapshots to redo.
    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.entries.len()
    }

    /// Current step pointer.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot cap, if any.
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut history = History::new("a");
        assert!(history.snapshot("b"));
        assert!(!history.snapshot("b"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.step(), 1);
    }

    #[test]
    fn test_undo_reverts_pending_edit_first() {
        let mut history = History::new("a");
        history.snapshot("ab");

        // "abc" was typed but never committed
        assert_eq!(history.undo("abc"), "ab");
        assert_eq!(history.step(), 1);

        assert_eq!(history.undo("ab"), "a");
        assert_eq!(history.step(), 0);
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut history = History::new("only");
        assert!(!history.can_undo("only"));
        assert_eq!(history.undo("only"), "only");
        assert_eq!(history.step(), 0);
    }

    #[test]
    fn test_redo_at_end_is_noop() {
        let mut history = History::new("a");
        history.snapshot("b");
        assert!(!history.can_redo());
        assert_eq!(history.redo("b"), "b");
        assert_eq!(history.step(), 1);
    }

    #[test]
    fn test_new_snapshot_drops_redo_branch() {
        let mut history = History::new("a");
        history.snapshot("b");
        history.snapshot("c");

        assert_eq!(history.undo("c"), "b");
        history.snapshot("x");

        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.redo("x"), "x");
        assert_eq!(history.undo("x"), "b");
        assert_eq!(history.undo("b"), "a");
    }

    #[test]
    fn test_reset() {
        let mut history = History::new("a");
        history.snapshot("b");
        history.reset("other note");
        assert_eq!(history.len(), 1);
        assert_eq!(history.step(), 0);
        assert_eq!(history.current(), "other note");
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut history = History::new("s0");
        assert_eq!(history.max_size(), None);

        for i in 1..=1500 {
            history.snapshot(&format!("s{i}"));
        }
        assert_eq!(history.len(), 1501);

        let mut live = history.current().to_string();
        for _ in 0..1500 {
            live = history.undo(&live);
        }
        assert_eq!(live, "s0");
        assert!(!history.can_undo(&live));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit("0", Some(3));
        for text in ["1", "2", "3", "4"] {
            history.snapshot(text);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.step(), 2);
        assert_eq!(history.undo("4"), "3");
        assert_eq!(history.undo("3"), "2");
        assert_eq!(history.undo("2"), "2");
    }

    proptest! {
        #[test]
        fn prop_undo_then_redo_walks_the_whole_history(
            texts in prop::collection::vec("[a-c]{1,4}", 1..20),
        ) {
            let mut snapshots = vec![String::new()];
            for text in texts {
                if snapshots.last() != Some(&text) {
                    snapshots.push(text);
                }
            }

            let mut history = History::new(snapshots[0].clone());
            for text in &snapshots[1..] {
                history.snapshot(text);
            }

            let n = snapshots.len() - 1;
            let mut live = snapshots[n].clone();
            for _ in 0..n {
                live = history.undo(&live);
            }
            prop_assert_eq!(&live, &snapshots[0]);

            for _ in 0..n {
                live = history.redo(&live);
            }
            prop_assert_eq!(&live, &snapshots[n]);
        }

        #[test]
        fn prop_step_stays_in_range(
            ops in prop::collection::vec((0u8..3, "[a-b]{0,2}"), 0..40),
        ) {
            let mut history = History::with_limit("", Some(8));
            let mut live = String::new();
            for (op, text) in ops {
                live = match op {
                    0 => {
                        history.snapshot(&text);
                        text
                    }
                    1 => history.undo(&live),
                    _ => history.redo(&live),
                };
                prop_assert!(history.step() < history.len());
                prop_assert!(history.len() <= 8);
            }
        }
    }
}
