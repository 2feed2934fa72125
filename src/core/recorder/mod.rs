//! # Decision Recorder
//!
//! Append-only audit trail of what was kept and what was removed.
//!
//! ## Format
//! ```text
//!
//! Title    : Heat
//! 	Keeping  : {"id":4711,"audio_codec":"dca",...}
//! 	Removing : {"id":4712,"audio_codec":"aac",...}
//! 	Removing : {"id":4713,...} (protected by skip list)
//! ```
//! The file is opened, appended, flushed and closed for every group so an
//! interrupted run never loses earlier entries.

use crate::core::media::MediaInfo;
use crate::core::resolver::Decision;
use crate::error::RecordError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes one block per resolved group
#[derive(Debug, Clone)]
pub struct DecisionRecorder {
    path: PathBuf,
}

impl DecisionRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the decision for `title`.
    ///
    /// Removals the skip list protected are still listed, with a note.
    pub fn record(&self, title: &str, decision: &Decision) -> Result<(), RecordError> {
        let mut block = format!("\nTitle    : {}\n", title);
        block.push_str(&format!("\tKeeping  : {}\n", describe(decision.keeper())?));
        for removal in decision.removals() {
            let note = if !removal.will_delete {
                " (protected by skip list)"
            } else {
                ""
            };
            block.push_str(&format!("\tRemoving : {}{}\n", describe(&removal.media)?, note));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RecordError::Open {
                path: self.path.clone(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| RecordError::Open {
                path: self.path.clone(),
                source,
            })?;

        file.write_all(block.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|source| RecordError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

fn describe(media: &MediaInfo) -> Result<String, RecordError> {
    serde_json::to_string(media).map_err(|e| RecordError::Serialize(e.to_string()))
}
