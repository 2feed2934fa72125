//! Duplicate groups as reported by the library.

use crate::core::media::{MediaInfo, MediaKind};
use serde::{Deserialize, Serialize};

/// Copies of one logical title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Display title, e.g. `Heat` or `Lost - 01x04 - Walkabout`
    pub title: String,
    pub kind: MediaKind,
    /// In the order the library returned them
    pub candidates: Vec<MediaInfo>,
}

impl DuplicateGroup {
    pub fn new(title: impl Into<String>, kind: MediaKind, candidates: Vec<MediaInfo>) -> Self {
        Self {
            title: title.into(),
            kind,
            candidates,
        }
    }

    /// Two or more copies left to choose between
    pub fn is_duplicate(&self) -> bool {
        self.candidates.len() > 1
    }

    /// True when every file of every copy has the same path.
    ///
    /// Filepath-only mode only acts on such groups: the library indexed the
    /// same file more than once.
    pub fn shares_single_path(&self) -> bool {
        let mut files = self.candidates.iter().flat_map(|c| c.files.iter());
        match files.next() {
            Some(first) => files.all(|f| f == first),
            None => false,
        }
    }
}
