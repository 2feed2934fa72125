//! Event type definitions for progress reporting.

use crate::core::media::MediaInfo;
use serde::{Deserialize, Serialize};

/// All events emitted while finding and removing duplicates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Querying the library for duplicates
    Scan(ScanEvent),
    /// Choosing a keeper for a group
    Resolve(ResolveEvent),
    /// Removing the other copies
    Delete(DeleteEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while querying library sections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { sections: Vec<String> },
    /// One section was queried
    SectionScanned { section: String, duplicates: usize },
    /// A section could not be queried; the others continue
    SectionFailed { section: String, message: String },
    /// Filepath-only mode dropped a group whose copies live at different paths
    GroupExcluded { title: String },
    /// Scanning completed
    Completed { total_groups: usize },
}

/// Events while choosing which copy to keep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResolveEvent {
    /// Work on a group has started
    GroupStarted { title: String, candidates: usize },
    /// The operator is being asked to choose.
    /// `candidates` is in selection order; position 1 is the best.
    AwaitingSelection {
        title: String,
        candidates: Vec<MediaInfo>,
        scored: bool,
    },
    /// A keeper was chosen
    Kept { title: String, media: MediaInfo },
    /// The group was left alone
    Skipped { title: String, reason: SkipReason },
}

/// Why a group produced no deletions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The operator answered `0`
    OperatorSkipped,
    /// The operator's answer was not a valid choice
    InvalidSelection { input: String },
    /// No copy scored above zero
    NoViableKeeper,
    /// Fewer than two copies remain
    NotDuplicate,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::OperatorSkipped => write!(f, "skipped by operator"),
            SkipReason::InvalidSelection { input } => {
                write!(f, "unexpected response {:?}, skipping deletion(s)", input)
            }
            SkipReason::NoViableKeeper => write!(f, "unable to determine best media item to keep"),
            SkipReason::NotDuplicate => write!(f, "no duplicates left"),
        }
    }
}

/// Events for each copy that is not kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeleteEvent {
    /// A copy is about to be removed
    Removing { media: MediaInfo },
    /// The skip list protected this copy
    Vetoed { media_id: u64, fragment: String },
    /// The server confirmed the deletion
    Deleted { media_id: u64 },
    /// The deletion failed; processing continues
    Failed { media_id: u64, message: String },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline finished
    Completed { summary: RunSummary },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Resolving,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Finding dupes"),
            PipelinePhase::Resolving => write!(f, "Resolving dupes"),
        }
    }
}

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Duplicate groups reported by the library
    pub groups_found: usize,
    /// Groups where a keeper was chosen
    pub groups_resolved: usize,
    /// Groups skipped by the operator or for invalid input
    pub groups_skipped: usize,
    /// Groups where no copy scored above zero
    pub groups_unresolved: usize,
    /// Delete calls the server accepted
    pub deleted: usize,
    /// Delete calls that failed
    pub delete_failures: usize,
    /// Copies protected by the skip list
    pub vetoed: usize,
    /// Bytes freed by accepted deletions
    pub reclaimed_bytes: u64,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Resolve(ResolveEvent::Skipped {
            title: "Heat".to_string(),
            reason: SkipReason::InvalidSelection {
                input: "x".to_string(),
            },
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Resolve(ResolveEvent::Skipped { title, reason }) => {
                assert_eq!(title, "Heat");
                assert_eq!(reason, SkipReason::InvalidSelection { input: "x".to_string() });
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn summary_is_serializable() {
        let summary = RunSummary {
            groups_found: 12,
            deleted: 9,
            reclaimed_bytes: 48_000_000_000,
            ..Default::default()
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("48000000000"));
    }

    #[test]
    fn invalid_selection_reason_shows_input() {
        let reason = SkipReason::InvalidSelection {
            input: "seven".to_string(),
        };
        assert!(reason.to_string().contains("\"seven\""));
    }
}
