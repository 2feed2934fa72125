//! In-process library.
//!
//! Holds items per section and applies deletions to them, so a second run
//! over the same library sees what the first run left behind. Clones share
//! state, which lets a caller inspect the library after handing a clone to
//! the pipeline.

use super::models::LibraryItem;
use super::{LibraryClient, LibrarySection};
use crate::error::LibraryError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    sections: HashMap<String, Vec<LibraryItem>>,
    failing_sections: HashSet<String>,
    failing_media: HashSet<u64>,
    deleted: Vec<(String, u64)>,
}

/// Library kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    state: Arc<Mutex<State>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add an item to a section, creating the section if needed
    pub fn insert(&self, section: &str, item: LibraryItem) {
        self.state()
            .sections
            .entry(section.to_string())
            .or_default()
            .push(item);
    }

    /// Make every query of `section` fail
    pub fn fail_section(&self, section: &str) {
        self.state().failing_sections.insert(section.to_string());
    }

    /// Make deleting `media_id` fail
    pub fn fail_delete(&self, media_id: u64) {
        self.state().failing_media.insert(media_id);
    }

    /// Successful deletions as `(container_key, media_id)`, in call order
    pub fn deleted(&self) -> Vec<(String, u64)> {
        self.state().deleted.clone()
    }

    /// Media ids still attached to the item at `container_key`
    pub fn remaining(&self, container_key: &str) -> Vec<u64> {
        self.state()
            .sections
            .values()
            .flatten()
            .filter(|item| item.container_key() == container_key)
            .flat_map(|item| item.media.iter().filter_map(|m| m.id))
            .collect()
    }
}

impl LibraryClient for MemoryLibrary {
    fn duplicates(&self, section: &LibrarySection) -> Result<Vec<LibraryItem>, LibraryError> {
        let state = self.state();
        if state.failing_sections.contains(&section.name) {
            return Err(LibraryError::Request {
                url: format!("memory://{}", section.name),
                reason: "section unavailable".to_string(),
            });
        }
        let items = state
            .sections
            .get(&section.name)
            .ok_or_else(|| LibraryError::SectionNotFound {
                name: section.name.clone(),
            })?;

        Ok(items.iter().filter(|item| item.media.len() > 1).cloned().collect())
    }

    fn delete_media(&self, container_key: &str, media_id: u64) -> Result<(), LibraryError> {
        let mut state = self.state();
        let url = format!("memory://{}/media/{}", container_key, media_id);
        if state.failing_media.contains(&media_id) {
            return Err(LibraryError::Status { url, status: 500 });
        }

        let item = state
            .sections
            .values_mut()
            .flatten()
            .find(|item| item.container_key() == container_key)
            .ok_or(LibraryError::Status {
                url: url.clone(),
                status: 404,
            })?;
        let before = item.media.len();
        item.media.retain(|m| m.id != Some(media_id));
        if item.media.len() == before {
            return Err(LibraryError::Status { url, status: 404 });
        }

        state.deleted.push((container_key.to_string(), media_id));
        Ok(())
    }
}
