//! # Zenote Buffer
//!
//! The text-level half of the editor: markdown transforms, snapshot
//! history, debounced snapshotting and search. Nothing here knows about
//! notes, commands or the UI.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Ownership & Borrowing
//! - Transforms borrow the input text (`&str`) and return owned results
//! - `History` owns its snapshots; `current()` lends one out as `&str`
//! - Mutations require `&mut self` (exclusive access)
//!
//! ### Pure Functions
//! - `transform::apply` and `search::find` have no state at all
//! - State lives in small structs (`History`, `SearchIndex`) owned by the
//!   editing session

pub mod debounce;
pub mod history;
pub mod search;
pub mod selection;
pub mod transform;

pub use debounce::SnapshotDebouncer;
pub use history::History;
pub use search::{Match, SearchIndex, find};
pub use selection::Selection;
pub use transform::{Transform, TransformResult, apply};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Selection {start}..{end} is out of bounds for a buffer of {len} chars")]
    SelectionOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Selection is invalid: start {start} is after end {end}")]
    InvalidSelection { start: usize, end: usize },
}
