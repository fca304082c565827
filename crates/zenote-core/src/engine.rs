//! Command dispatch.
//!
//! ## Learning: One `match` Instead of a Handler Table
//!
//! Each toolbar command either maps to a [`Transform`] or is a control
//! command routed to history or the UI. Both cases are decided in one
//! exhaustive `match` in [`CommandEngine::dispatch`], so a new `Command`
//! variant does not compile until it is handled here.
//!
//! ## History Protocol
//!
//! A text-producing command snapshots the buffer as it was before applying
//! the transform and again afterwards. The first snapshot captures any
//! typing the debouncer had not committed yet, so one undo always steps
//! back over exactly one command.

use std::sync::Arc;

use zenote_buffer::{History, Selection, Transform, apply};

use crate::CoreResult;
use crate::clock::Clock;
use crate::command::Command;
use crate::config::EditorConfig;
use crate::note::derive_title;

/// What a control command asks the session (and the UI) to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEffect {
    /// Show or hide the search bar
    ToggleSearch,
    /// Dismiss the on-screen keyboard
    HideKeyboard,
    /// Ask for confirmation and delete the open note
    DeleteNote,
    /// Open the font size picker
    FontSize,
}

/// Outcome of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Buffer after the command
    pub text: String,
    /// Title derived from `text`
    pub title: String,
    /// Selection to show
    pub selection: Selection,
    /// Whether the history length or step pointer moved
    pub history_changed: bool,
    /// Work left for the session, for control commands
    pub effect: Option<ControlEffect>,
}

impl Dispatch {
    fn effect(text: &str, selection: Selection, effect: ControlEffect) -> Self {
        Self {
            text: text.to_string(),
            title: derive_title(text),
            selection,
            history_changed: false,
            effect: Some(effect),
        }
    }

    /// Returns true if the buffer differs from `before`.
    pub fn changed_text(&self, before: &str) -> bool {
        self.text != before
    }
}

/// Applies toolbar commands to a buffer and keeps its undo history.
pub struct CommandEngine {
    history: History,
    clock: Arc<dyn Clock>,
    timestamp_format: String,
}

impl CommandEngine {
    /// Creates an engine whose history starts at `initial`.
    pub fn new(initial: impl Into<String>, config: &EditorConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            history: History::with_limit(initial, config.history_limit),
            clock,
            timestamp_format: config.timestamp_format.clone(),
        }
    }

    /// Starts over with a single history entry (another note was opened).
    pub fn reset(&mut self, initial: impl Into<String>) {
        self.history.reset(initial);
    }

    /// The undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Commits `text` as a snapshot (debounced typing).
    pub fn snapshot(&mut self, text: &str) -> bool {
        self.history.snapshot(text)
    }

    /// Runs `command` against `buffer`.
    ///
    /// # Errors
    ///
    /// Fails if `selection` does not fit `buffer`.
    pub fn dispatch(
        &mut self,
        command: Command,
        buffer: &str,
        selection: Selection,
    ) -> CoreResult<Dispatch> {
        selection.validate(buffer.chars().count())?;
        tracing::debug!(command = command.id(), %selection, "dispatching command");

        let transform = match command {
            Command::Undo => return Ok(self.undo(buffer, selection)),
            Command::Redo => return Ok(self.redo(buffer, selection)),
            Command::FontSize => {
                return Ok(Dispatch::effect(buffer, selection, ControlEffect::FontSize));
            }
            Command::SearchToggle => {
                return Ok(Dispatch::effect(buffer, selection, ControlEffect::ToggleSearch));
            }
            Command::HideKeyboard => {
                return Ok(Dispatch::effect(buffer, selection, ControlEffect::HideKeyboard));
            }
            Command::DeleteNote => {
                return Ok(Dispatch::effect(buffer, selection, ControlEffect::DeleteNote));
            }

            Command::Heading1 => Transform::LinePrefix("#"),
            Command::Heading2 => Transform::LinePrefix("##"),
            Command::Heading3 => Transform::LinePrefix("###"),
            Command::BulletList => Transform::LinePrefix("-"),
            Command::OrderedList => Transform::LinePrefix("1."),
            Command::TaskItem => Transform::LinePrefix("- [ ]"),
            Command::Blockquote => Transform::LinePrefix(">"),
            Command::Indent => Transform::Indent,
            Command::Outdent => Transform::Outdent,
            Command::Bold => Transform::Wrap("**"),
            Command::Italic => Transform::Wrap("_"),
            Command::InlineCode => Transform::Wrap("`"),
            Command::MathBlock => Transform::MathBlock,
            Command::Timestamp => {
                Transform::Insert(self.clock.local_timestamp(&self.timestamp_format))
            }
            Command::Link => Transform::Link,
            Command::Tag => Transform::Tag,
        };

        self.apply_transform(&transform, buffer, selection)
    }

    /// Replaces the buffer with text produced outside the toolbar (AI edits).
    ///
    /// Follows the same protocol as a command: snapshot before, snapshot
    /// after. Returns whether the history moved.
    pub fn apply_edit(&mut self, buffer: &str, new_text: &str) -> bool {
        let before = self.position();
        self.history.snapshot(buffer);
        self.history.snapshot(new_text);
        self.position() != before
    }

    fn apply_transform(
        &mut self,
        transform: &Transform,
        buffer: &str,
        selection: Selection,
    ) -> CoreResult<Dispatch> {
        let before = self.position();
        self.history.snapshot(buffer);

        let result = apply(transform, buffer, selection)?;
        self.history.snapshot(&result.new_text);

        Ok(Dispatch {
            selection: result.selection(),
            title: derive_title(&result.new_text),
            text: result.new_text,
            history_changed: self.position() != before,
            effect: None,
        })
    }

    fn undo(&mut self, buffer: &str, selection: Selection) -> Dispatch {
        let before = self.position();
        let text = self.history.undo(buffer);
        self.restored(text, selection, before)
    }

    fn redo(&mut self, buffer: &str, selection: Selection) -> Dispatch {
        let before = self.position();
        let text = self.history.redo(buffer);
        self.restored(text, selection, before)
    }

    fn restored(&self, text: String, selection: Selection, before: (usize, usize)) -> Dispatch {
        let len = text.chars().count();
        Dispatch {
            selection: Selection::cursor(selection.end).clamp_to(len),
            title: derive_title(&text),
            text,
            history_changed: self.position() != before,
            effect: None,
        }
    }

    fn position(&self) -> (usize, usize) {
        (self.history.len(), self.history.step())
    }
}

impl std::fmt::Debug for CommandEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEngine")
            .field("history", &self.history)
            .field("timestamp_format", &self.timestamp_format)
            .finish_non_exhaustive()
    }
}
