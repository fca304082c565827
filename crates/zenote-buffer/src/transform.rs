//! Structural markdown transforms.
//!
//! Every transform is a pure function of `(text, selection)`: it never
//! touches history or the note, it just builds the new text and says where
//! the cursor should land. The command engine decides which transform a
//! toolbar button maps to.
//!
//! ## Learning: Ropes for Char Offsets
//!
//! Selections are counted in `char`s. Slicing a `String` by char offset
//! means walking it from the front every time, while `ropey::Rope` keeps
//! an index of char positions, so `insert`/`remove` take char offsets
//! directly and can never land inside a UTF-8 sequence.

use ropey::Rope;
use serde::{Deserialize, Serialize};

use crate::{BufferResult, Selection};

/// One level of indentation.
pub const INDENT_UNIT: &str = "  ";

/// Label inserted by [`Transform::Link`] when nothing is selected.
pub const LINK_PLACEHOLDER: &str = "text";

/// Target inserted by [`Transform::Link`].
pub const LINK_TARGET: &str = "url";

/// Text inserted by [`Transform::MathBlock`].
pub const MATH_BLOCK: &str = "$$\n\n$$";

/// The outcome of applying a transform.
///
/// `cursor_start..cursor_start + cursor_len` is always inside `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResult {
    /// The full buffer after the transform
    pub new_text: String,
    /// Where the cursor (or selection) starts
    pub cursor_start: usize,
    /// How many chars stay selected after the cursor
    pub cursor_len: usize,
}

impl TransformResult {
    /// Result that leaves text and selection as they were.
    pub fn unchanged(text: &str, selection: Selection) -> Self {
        Self {
            new_text: text.to_string(),
            cursor_start: selection.start,
            cursor_len: selection.len(),
        }
    }

    /// The selection to show after the transform.
    pub fn selection(&self) -> Selection {
        Selection::new(self.cursor_start, self.cursor_start + self.cursor_len)
    }
}

/// A text transformation bound to its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Surround the selection with a marker (`**`, `_`, `` ` ``).
    Wrap(&'static str),
    /// Replace the selection with a new line starting with `<prefix> `.
    LinePrefix(&'static str),
    /// Replace the selection with an empty `$$` block.
    MathBlock,
    /// Replace the selection with literal text (timestamps).
    Insert(String),
    /// Turn the selection into a markdown link.
    Link,
    /// Replace the selection with a bare `#`.
    Tag,
    /// Start a new line indented by one unit.
    Indent,
    /// Remove one indent unit from every touched line.
    Outdent,
}

/// Applies a transform to `text`.
///
/// # Errors
///
/// Fails with [`crate::BufferError::SelectionOutOfBounds`] when the
/// selection does not fit the text. Nothing is clamped.
pub fn apply(
    transform: &Transform,
    text: &str,
    selection: Selection,
) -> BufferResult<TransformResult> {
    let mut rope = Rope::from_str(text);
    selection.validate(rope.len_chars())?;

    tracing::trace!(?transform, %selection, "applying transform");

    let result = match transform {
        Transform::Wrap(marker) => {
            // Insert at the end first so `start` stays valid.
            rope.insert(selection.end, marker);
            rope.insert(selection.start, marker);
            TransformResult {
                new_text: rope.to_string(),
                cursor_start: selection.start + char_len(marker),
                cursor_len: selection.len(),
            }
        }
        Transform::LinePrefix(prefix) => line_prefix(&mut rope, selection, prefix),
        Transform::Indent => line_prefix(&mut rope, selection, INDENT_UNIT),
        Transform::MathBlock => {
            replace(&mut rope, selection, MATH_BLOCK);
            TransformResult {
                new_text: rope.to_string(),
                // Between the two `$$` lines
                cursor_start: selection.start + 3,
                cursor_len: 0,
            }
        }
        Transform::Insert(inserted) => {
            replace(&mut rope, selection, inserted);
            TransformResult {
                new_text: rope.to_string(),
                cursor_start: selection.start + char_len(inserted),
                cursor_len: 0,
            }
        }
        Transform::Link => {
            let selected = rope.slice(selection.range()).to_string();
            let label = if selected.is_empty() {
                LINK_PLACEHOLDER
            } else {
                selected.as_str()
            };
            let link = format!("[{label}]({LINK_TARGET})");
            replace(&mut rope, selection, &link);
            TransformResult {
                new_text: rope.to_string(),
                cursor_start: selection.start + 1,
                cursor_len: char_len(label),
            }
        }
        Transform::Tag => {
            replace(&mut rope, selection, "#");
            TransformResult {
                new_text: rope.to_string(),
                cursor_start: selection.start + 1,
                cursor_len: 0,
            }
        }
        Transform::Outdent => outdent(&mut rope, selection),
    };

    Ok(result)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn replace(rope: &mut Rope, selection: Selection, with: &str) {
    rope.remove(selection.range());
    rope.insert(selection.start, with);
}

fn line_prefix(rope: &mut Rope, selection: Selection, prefix: &str) -> TransformResult {
    let inserted = format!("\n{prefix} ");
    replace(rope, selection, &inserted);
    TransformResult {
        new_text: rope.to_string(),
        cursor_start: selection.start + char_len(&inserted),
        cursor_len: 0,
    }
}

/// Width of the leading indentation that one outdent removes.
fn removable_indent(rope: &Rope, line_start: usize) -> usize {
    let mut chars = rope.chars_at(line_start);
    match (chars.next(), chars.next()) {
        (Some(' '), Some(' ')) => INDENT_UNIT.len(),
        (Some(' ' | '\t'), _) => 1,
        _ => 0,
    }
}

fn outdent(rope: &mut Rope, selection: Selection) -> TransformResult {
    let first_line = rope.char_to_line(selection.start);
    let mut last_line = rope.char_to_line(selection.end);

    // A range ending right at the start of a line doesn't touch that line.
    if !selection.is_cursor()
        && last_line > first_line
        && rope.line_to_char(last_line) == selection.end
    {
        last_line -= 1;
    }

    let removals: Vec<(usize, usize)> = (first_line..=last_line)
        .map(|line| {
            let line_start = rope.line_to_char(line);
            (line_start, removable_indent(rope, line_start))
        })
        .filter(|&(_, width)| width > 0)
        .collect();

    if removals.is_empty() {
        return TransformResult::unchanged(&rope.to_string(), selection);
    }

    let shift = |offset: usize| -> usize {
        let removed: usize = removals
            .iter()
            .map(|&(line_start, width)| width.min(offset.saturating_sub(line_start)))
            .sum();
        offset - removed
    };
    let start = shift(selection.start);
    let end = shift(selection.end);

    for &(line_start, width) in removals.iter().rev() {
        rope.remove(line_start..line_start + width);
    }

    TransformResult {
        new_text: rope.to_string(),
        cursor_start: start,
        cursor_len: end - start,
    }
}
