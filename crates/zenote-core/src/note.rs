//! Notes and title derivation.
//!
//! ## Learning: Newtypes
//!
//! `NoteId` is a newtype wrapper around `Uuid`. This provides:
//! - Type safety: Can't accidentally pass a notebook id where a note id goes
//! - Encapsulation: Can change the underlying type without breaking APIs
//! - Documentation: The type name explains its purpose

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

/// Title used when the first line has no text.
pub const UNTITLED_NOTE: &str = "Untitled Note";

/// Longest derived title, in chars.
///
/// Counted in `char`s like every other offset here, not UTF-16 code
/// units, so a title of astral-plane text can be longer than 100 units.
pub const MAX_TITLE_CHARS: usize = 100;

/// Unique identifier for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Creates a new unique note ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID (as handed over by storage).
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotebookId(Uuid);

impl NotebookId {
    /// Creates a new unique notebook ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotebookId {
    fn default() -> Self {
        Self::new()
    }
}

/// A note as the storage collaborator hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub notebook_id: Option<NotebookId>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note with a fresh id and a title derived from `content`.
    pub fn new(content: impl Into<String>, now: DateTime<Utc>) -> Self {
        let content = content.into();
        Self {
            id: NoteId::new(),
            title: derive_title(&content),
            content,
            notebook_id: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the content, re-deriving the title.
    pub fn set_content(&mut self, content: impl Into<String>, now: DateTime<Utc>) {
        self.content = content.into();
        self.title = derive_title(&self.content);
        self.updated_at = now;
    }
}

/// Derives a display title from the first line of `content`.
///
/// Leading `#` and whitespace are stripped, the inline markers `*`, `_`
/// and `` ` `` are removed, and the rest is trimmed and cut to
/// [`MAX_TITLE_CHARS`] without splitting a grapheme cluster.
pub fn derive_title(content: &str) -> String {
    let first_line = content.split('\n').next().unwrap_or_default();
    let cleaned: String = first_line
        .trim_start_matches(|c: char| c == '#' || c.is_whitespace())
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`'))
        .collect();
    let cleaned = cleaned.trim();

    let mut title = String::new();
    let mut chars = 0;
    for grapheme in cleaned.graphemes(true) {
        let width = grapheme.chars().count();
        if chars + width > MAX_TITLE_CHARS {
            break;
        }
        title.push_str(grapheme);
        chars += width;
    }

    if title.is_empty() {
        UNTITLED_NOTE.to_string()
    } else {
        title
    }
}
