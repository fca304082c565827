//! Session notifications.
//!
//! ## Learning: Broadcast Channels as Observers
//!
//! The session does not hold references to whoever cares about its
//! changes. It sends `EditorEvent` values into a `tokio::sync::broadcast`
//! channel and every subscriber gets its own clone of each event.
//!
//! The storage layer listens for [`EditorEvent::NoteChanged`] and persists
//! the note; the UI listens for the rest. The session never calls either
//! of them directly.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::note::NoteId;

/// Number of events a slow subscriber may fall behind by.
const EVENT_CAPACITY: usize = 256;

/// Events emitted by an editing session.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    // Note events
    /// A note was loaded into the session
    NoteOpened(NoteId),
    /// The note's content changed and should be persisted
    NoteChanged {
        id: NoteId,
        title: String,
        content: String,
        updated_at: DateTime<Utc>,
    },
    /// The user asked to delete the note (confirmation is up to the UI)
    DeleteRequested(NoteId),
    /// The session was closed
    NoteClosed(NoteId),

    // UI events
    /// The search bar was shown or hidden
    SearchToggled { visible: bool },
    /// The on-screen keyboard should be dismissed
    KeyboardHidden,
    /// The font size picker should open
    FontSizePanelRequested,
    /// Font size changed
    FontSizeChanged(u32),
    /// The toolbar layout changed
    ToolbarChanged,
}

/// Fan-out of session events to any number of listeners.
///
/// Sending never blocks. A listener that falls more than
/// `EVENT_CAPACITY` events behind loses the oldest ones.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Sends `event` to every current subscriber.
    pub fn emit(&self, event: EditorEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("event dropped, nobody is listening");
        }
    }

    /// A receiver for events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}

/// Receiver wrapper that treats falling behind as a warning, not an error.
///
/// ## Example
///
/// ```ignore
/// let mut events = EventHandler::new(session.subscribe());
///
/// tokio::spawn(async move {
///     while let Some(event) = events.next().await {
///         if let EditorEvent::NoteChanged { id, content, .. } = event {
///             store.save(id, content).await;
///         }
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<EditorEvent>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<EditorEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event. `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => warn_lagged(missed),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The next event if one is already queued.
    pub fn try_next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(missed)) => warn_lagged(missed),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

fn warn_lagged(missed: u64) {
    tracing::warn!(missed, "event listener fell behind, skipping ahead");
}
