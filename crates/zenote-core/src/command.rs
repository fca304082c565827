//! Toolbar commands.
//!
//! ## Learning: Closed Enums
//!
//! The set of toolbar commands is fixed, so it is a plain enum without
//! `#[non_exhaustive]` and without a catch-all arm anywhere it is matched.
//! Adding a variant makes the compiler point at every `match` that has to
//! learn about it.
//!
//! Commands travel as short string ids (`"h2"`, `"list-ordered"`) in the
//! toolbar configuration; `FromStr` and `id()` are the only place those
//! strings live.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A toolbar command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Command {
    // History
    Undo,
    Redo,

    // Presentation
    FontSize,

    // Line prefixes
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    OrderedList,
    TaskItem,
    Blockquote,
    Indent,
    Outdent,

    // Inline wraps
    Bold,
    Italic,
    InlineCode,

    // Insertions
    MathBlock,
    Timestamp,
    Link,
    Tag,

    // UI-only
    SearchToggle,
    HideKeyboard,
    DeleteNote,
}

/// Toolbar order used until the user customises it.
pub const DEFAULT_TOOLBAR: [Command; 18] = [
    Command::Undo,
    Command::Redo,
    Command::FontSize,
    Command::Heading2,
    Command::Bold,
    Command::Italic,
    Command::InlineCode,
    Command::MathBlock,
    Command::OrderedList,
    Command::BulletList,
    Command::TaskItem,
    Command::Outdent,
    Command::Indent,
    Command::Timestamp,
    Command::Link,
    Command::Tag,
    Command::SearchToggle,
    Command::DeleteNote,
];

impl Command {
    /// Every command, in toolbar-settings order.
    pub const ALL: [Command; 22] = [
        Command::Undo,
        Command::Redo,
        Command::FontSize,
        Command::Heading1,
        Command::Heading2,
        Command::Heading3,
        Command::Bold,
        Command::Italic,
        Command::InlineCode,
        Command::MathBlock,
        Command::BulletList,
        Command::OrderedList,
        Command::TaskItem,
        Command::Outdent,
        Command::Indent,
        Command::Timestamp,
        Command::Link,
        Command::Tag,
        Command::Blockquote,
        Command::SearchToggle,
        Command::HideKeyboard,
        Command::DeleteNote,
    ];

    /// Stable identifier used in configuration.
    pub fn id(&self) -> &'static str {
        match self {
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::FontSize => "fontSize",
            Command::Heading1 => "h1",
            Command::Heading2 => "h2",
            Command::Heading3 => "h3",
            Command::BulletList => "list",
            Command::OrderedList => "list-ordered",
            Command::TaskItem => "task",
            Command::Blockquote => "quote",
            Command::Indent => "indent",
            Command::Outdent => "outdent",
            Command::Bold => "bold",
            Command::Italic => "italic",
            Command::InlineCode => "code",
            Command::MathBlock => "math",
            Command::Timestamp => "date",
            Command::Link => "link",
            Command::Tag => "tag",
            Command::SearchToggle => "search",
            Command::HideKeyboard => "hide-keyboard",
            Command::DeleteNote => "delete",
        }
    }

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::FontSize => "Font Size",
            Command::Heading1 => "Heading 1",
            Command::Heading2 => "Heading 2",
            Command::Heading3 => "Heading 3",
            Command::BulletList => "Bullet List",
            Command::OrderedList => "Numbered List",
            Command::TaskItem => "Task List",
            Command::Blockquote => "Quote",
            Command::Indent => "Increase Indent",
            Command::Outdent => "Decrease Indent",
            Command::Bold => "Bold",
            Command::Italic => "Italic",
            Command::InlineCode => "Code",
            Command::MathBlock => "Math Block",
            Command::Timestamp => "Insert Time",
            Command::Link => "Link",
            Command::Tag => "Tag",
            Command::SearchToggle => "Search",
            Command::HideKeyboard => "Hide Keyboard",
            Command::DeleteNote => "Delete Note",
        }
    }

    /// Returns true for commands that never transform text.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Command::Undo
                | Command::Redo
                | Command::FontSize
                | Command::SearchToggle
                | Command::HideKeyboard
                | Command::DeleteNote
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Command {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.id() == s)
            .ok_or_else(|| CoreError::UnknownCommand(s.to_string()))
    }
}

impl TryFrom<String> for Command {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Command> for String {
    fn from(cmd: Command) -> Self {
        cmd.id().to_string()
    }
}
