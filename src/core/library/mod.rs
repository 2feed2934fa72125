//! # Library Module
//!
//! Access to the remote media library: finding duplicate items and
//! deleting individual copies.
//!
//! ## Implementations
//! - [`PlexClient`]: the Plex HTTP API
//! - [`MemoryLibrary`]: in-process library for tests and dry runs

mod memory;
mod models;
mod plex;

pub use memory::MemoryLibrary;
pub use models::{LibraryItem, MediaContainer, SectionDirectory};
pub use plex::PlexClient;

use crate::core::media::MediaKind;
use crate::error::LibraryError;

/// A configured library section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    /// Section name as shown in Plex, e.g. `Movies`
    pub name: String,
    pub kind: MediaKind,
}

impl LibrarySection {
    pub fn new(name: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A remote library holding duplicated items
pub trait LibraryClient {
    /// Items in `section` the server reports as having more than one copy
    fn duplicates(&self, section: &LibrarySection) -> Result<Vec<LibraryItem>, LibraryError>;

    /// Delete one copy of the item at `container_key`
    fn delete_media(&self, container_key: &str, media_id: u64) -> Result<(), LibraryError>;
}
