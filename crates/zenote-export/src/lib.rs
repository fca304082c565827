//! # Zenote Export
//!
//! Turns a note into exportable pieces: weighted pagination into cards and
//! the naming of exported files.
//!
//! ## Learning: Pure Functions at the Edge
//!
//! Rendering cards to images is the UI's job. This crate only decides
//! *where* a note is split and *what* files are called, so everything here
//! is a plain function of its inputs and is tested without any renderer.

pub mod file;
pub mod paginate;

pub use file::{
    ExportFormat, ExportSettings, file_contents, file_name, page_file_suffix, page_image_name,
};
pub use paginate::{Capacity, LineWeights, PageMode, Paginator, THREE_FOUR_CAPACITY, paginate};

/// Errors raised while parsing export options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Unknown page mode: {0}")]
    UnknownMode(String),
}
