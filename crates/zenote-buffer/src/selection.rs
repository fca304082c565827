//! Cursor and range selections.
//!
//! ## Learning: Half-Open Ranges
//!
//! A selection is `start..end` with the end excluded, the same shape as
//! `std::ops::Range`. A cursor is simply the empty range `n..n`, and the
//! length is `end - start` with no off-by-one.
//!
//! Offsets count `char`s, not bytes. ropey indexes a rope the same way, so
//! a selection can be handed straight to `Rope::insert`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{BufferError, BufferResult};

/// The user's cursor or highlighted range.
///
/// [`Selection::new`] orders its offsets. A literal with `start > end`
/// is rejected by [`Selection::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Selection {
    /// Selection between two offsets, in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A bare cursor at `offset`.
    pub fn cursor(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns true if nothing is highlighted.
    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }

    /// Number of chars covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Same as [`Selection::is_cursor`].
    pub fn is_empty(&self) -> bool {
        self.is_cursor()
    }

    /// Returns the selection as a char range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Checks the selection against a buffer of `len_chars` characters.
    ///
    /// An out-of-range selection is a caller bug, so it is reported
    /// rather than clamped.
    pub fn validate(&self, len_chars: usize) -> BufferResult<()> {
        if self.start > self.end {
            return Err(BufferError::InvalidSelection {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > len_chars {
            return Err(BufferError::SelectionOutOfBounds {
                start: self.start,
                end: self.end,
                len: len_chars,
            });
        }
        Ok(())
    }

    /// Returns the selected text.
    pub fn extract(&self, text: &str) -> String {
        text.chars().skip(self.start).take(self.len()).collect()
    }

    /// Pulls the selection back inside a buffer of `len_chars` characters.
    ///
    /// Only used after undo/redo swaps the whole buffer out, where the old
    /// selection has no meaning in the restored text.
    pub fn clamp_to(&self, len_chars: usize) -> Selection {
        Selection::new(self.start.min(len_chars), self.end.min(len_chars))
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Selection::new(range.start, range.end)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_cursor() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}
