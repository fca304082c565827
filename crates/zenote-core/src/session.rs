//! The editing session for one open note.
//!
//! ## Learning: The Facade Pattern
//!
//! `EditorSession` acts as a facade over the command engine, the snapshot
//! debouncer, the search index and the configuration. The UI only talks
//! to the session; storage only listens to its events.
//!
//! ## Ownership
//!
//! Everything the session touches is owned by it and mutated through
//! `&mut self`. There is exactly one note per session, so no locking is
//! needed and no call can interleave with another.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use zenote_buffer::{History, Match, SearchIndex, Selection, SnapshotDebouncer};

use crate::CoreResult;
use crate::clock::Clock;
use crate::command::Command;
use crate::config::Config;
use crate::engine::{CommandEngine, ControlEffect, Dispatch};
use crate::event::{EditorEvent, EventBus};
use crate::note::{Note, NoteId};

/// State for editing a single note.
pub struct EditorSession {
    /// The open note
    note: Note,

    /// Command dispatch and undo history
    engine: CommandEngine,

    /// Pending typing snapshot
    debouncer: SnapshotDebouncer,

    /// In-note search
    search: SearchIndex,

    /// Whether the search bar is shown
    search_visible: bool,

    /// Editor configuration
    config: Config,

    /// Time source for timestamps
    clock: Arc<dyn Clock>,

    /// Event bus for notifications
    events: EventBus,
}

impl EditorSession {
    /// Creates a session for `note`.
    pub fn new(note: Note, config: Config, clock: Arc<dyn Clock>) -> Self {
        let engine = CommandEngine::new(note.content.clone(), &config.editor, Arc::clone(&clock));
        let debouncer = SnapshotDebouncer::new(config.editor.snapshot_delay());
        Self {
            note,
            engine,
            debouncer,
            search: SearchIndex::new(),
            search_visible: false,
            config,
            clock,
            events: EventBus::new(),
        }
    }

    // ==================== Note Lifecycle ====================

    /// Switches to another note. History starts over at its content.
    pub fn open(&mut self, note: Note) {
        self.debouncer.cancel();
        self.engine.reset(note.content.clone());
        self.search.clear();
        self.note = note;

        tracing::debug!(id = %self.note.id, "note opened");
        self.emit(EditorEvent::NoteOpened(self.note.id));
    }

    /// Ends the session. A pending typing snapshot is dropped.
    pub fn close(&mut self) {
        self.debouncer.cancel();
        self.emit(EditorEvent::NoteClosed(self.note.id));
    }

    // ==================== Editing ====================

    /// Records free-form typing.
    ///
    /// The snapshot is deferred until typing pauses; call [`tick`] to
    /// commit it.
    ///
    /// [`tick`]: EditorSession::tick
    pub fn type_text(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.note.content {
            return;
        }
        self.debouncer.schedule(text.clone(), now);
        self.set_content(text);
    }

    /// Commits the pending typing snapshot if its window has passed.
    ///
    /// Returns true if a history entry was added.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) => self.engine.snapshot(&text),
            None => false,
        }
    }

    /// Runs a toolbar command.
    ///
    /// Commands run whether or not they are visible on the toolbar.
    ///
    /// # Errors
    ///
    /// Fails if `selection` does not fit the note's content. The session
    /// is left untouched in that case.
    pub fn execute(&mut self, command: Command, selection: Selection) -> CoreResult<Dispatch> {
        let dispatch = self.engine.dispatch(command, &self.note.content, selection)?;

        match dispatch.effect {
            // The engine already snapshotted the buffer the command saw
            None => self.debouncer.cancel(),
            Some(ControlEffect::ToggleSearch) => self.toggle_search(),
            Some(ControlEffect::HideKeyboard) => self.emit(EditorEvent::KeyboardHidden),
            Some(ControlEffect::DeleteNote) => {
                self.emit(EditorEvent::DeleteRequested(self.note.id));
            }
            Some(ControlEffect::FontSize) => self.emit(EditorEvent::FontSizePanelRequested),
        }

        if dispatch.changed_text(&self.note.content) {
            self.set_content(dispatch.text.clone());
        }
        Ok(dispatch)
    }

    /// Replaces the content with text from an outside service (AI edits).
    ///
    /// Recorded like a command: one undo restores the text from before.
    pub fn apply_external_edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.debouncer.cancel();
        self.engine.apply_edit(&self.note.content, &text);
        if text != self.note.content {
            self.set_content(text);
        }
    }

    fn set_content(&mut self, text: String) {
        self.note.set_content(text, self.clock.now());
        if self.search_visible && !self.search.query().is_empty() {
            self.search.refresh(&self.note.content);
        }

        self.emit(EditorEvent::NoteChanged {
            id: self.note.id,
            title: self.note.title.clone(),
            content: self.note.content.clone(),
            updated_at: self.note.updated_at,
        });
    }

    // ==================== Search ====================

    /// Searches the note and moves to the first hit.
    pub fn search(&mut self, query: &str) -> &[Match] {
        self.search.search(query, &self.note.content)
    }

    /// Moves to the next hit, wrapping around.
    pub fn next_match(&mut self) -> Option<Match> {
        self.refresh_stale_search();
        self.search.next()
    }

    /// Moves to the previous hit, wrapping around.
    pub fn previous_match(&mut self) -> Option<Match> {
        self.refresh_stale_search();
        self.search.previous()
    }

    /// The hit the search cursor is on.
    pub fn current_match(&self) -> Option<Match> {
        self.search.current_match()
    }

    /// Whether the search bar is shown.
    pub fn is_search_visible(&self) -> bool {
        self.search_visible
    }

    fn toggle_search(&mut self) {
        self.search_visible = !self.search_visible;
        if !self.search_visible {
            self.search.clear();
        }
        self.emit(EditorEvent::SearchToggled {
            visible: self.search_visible,
        });
    }

    fn refresh_stale_search(&mut self) {
        if self.search.is_stale(&self.note.content) {
            self.search.refresh(&self.note.content);
        }
    }

    // ==================== Configuration ====================

    /// Makes the text one step larger.
    pub fn increase_font_size(&mut self) -> u32 {
        let size = self.config.editor.increase_font_size();
        self.emit(EditorEvent::FontSizeChanged(size));
        size
    }

    /// Makes the text one step smaller.
    pub fn decrease_font_size(&mut self) -> u32 {
        let size = self.config.editor.decrease_font_size();
        self.emit(EditorEvent::FontSizeChanged(size));
        size
    }

    /// Shows or hides a command on the toolbar. Returns the new visibility.
    pub fn toggle_toolbar_command(&mut self, command: Command) -> bool {
        let visible = self.config.toolbar.toggle(command);
        self.emit(EditorEvent::ToolbarChanged);
        visible
    }

    /// Returns the configuration (for persisting it).
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Accessors ====================

    /// The open note.
    pub fn note(&self) -> &Note {
        &self.note
    }

    /// The open note's id.
    pub fn note_id(&self) -> NoteId {
        self.note.id
    }

    /// The current buffer.
    pub fn content(&self) -> &str {
        &self.note.content
    }

    /// The undo history.
    pub fn history(&self) -> &History {
        self.engine.history()
    }

    /// Returns true if typing is waiting to be snapshotted.
    pub fn has_pending_snapshot(&self) -> bool {
        self.debouncer.is_pending()
    }

    // ==================== Events ====================

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.events.emit(event);
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("note", &self.note.id)
            .field("engine", &self.engine)
            .field("search_visible", &self.search_visible)
            .finish_non_exhaustive()
    }
}
