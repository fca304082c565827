//! # Zenote Core
//!
//! Toolbar commands, the editing session and configuration.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      EditorSession                        │
//! │  ┌──────────────┐ ┌──────────────┐ ┌───────────────────┐  │
//! │  │    Config    │ │  EventBus    │ │      Clock        │  │
//! │  └──────────────┘ └──────────────┘ └───────────────────┘  │
//! │         │                                                 │
//! │  ┌──────┴───────────────────────────────────────┐         │
//! │  │               CommandEngine                   │         │
//! │  │  ┌──────────┐ ┌────────────┐ ┌─────────────┐  │         │
//! │  │  │ Command  │ │ Transforms │ │   History   │  │         │
//! │  │  └──────────┘ └────────────┘ └─────────────┘  │         │
//! │  └──────────────────────────────────────────────┘         │
//! │     SnapshotDebouncer            SearchIndex              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod event;
pub mod note;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use command::Command;
pub use config::{Config, ConfigError, EditorConfig, ToolbarConfig};
pub use engine::{CommandEngine, ControlEffect, Dispatch};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use note::{Note, NoteId, NotebookId, derive_title};
pub use session::EditorSession;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Buffer error: {0}")]
    Buffer(#[from] zenote_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use zenote_buffer::Selection;

    #[test]
    fn test_toolbar_commands_from_config_drive_session() {
        let config: Config = toml::from_str("[toolbar]\nvisible = [\"h2\", \"bold\"]\n").unwrap();
        let clock = Arc::new(FixedClock::at_utc(2026, 1, 1, 0, 0, 0).unwrap());
        let note = Note::new("Title", clock.now());
        let mut session = EditorSession::new(note, config.clone(), clock);

        for command in &config.toolbar.visible {
            let len = session.content().chars().count();
            session.execute(*command, Selection::cursor(len)).unwrap();
        }
        assert_eq!(session.content(), "Title\n## ****");
        assert_eq!(session.note().title, "Title");
    }

    #[test]
    fn test_unknown_command_error() {
        let err = "sparkle".parse::<Command>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownCommand(ref id) if id == "sparkle"));
        assert_eq!(err.to_string(), "Unknown command: sparkle");
    }
}
