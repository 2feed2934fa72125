//! Pipeline execution implementation.

use crate::core::library::{LibraryClient, LibrarySection};
use crate::core::media::normalize;
use crate::core::recorder::DecisionRecorder;
use crate::core::resolver::{
    Decision, DuplicateGroup, KeeperPrompt, Policy, Resolution, Resolver,
};
use crate::core::scoring::{score, ScoringConfig};
use crate::core::skiplist::SkipList;
use crate::events::{
    DeleteEvent, Event, EventSender, PipelineEvent, PipelinePhase, ResolveEvent, RunSummary,
    ScanEvent, SkipReason,
};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Pause after each deletion request
pub const DEFAULT_DELETION_PAUSE: Duration = Duration::from_secs(2);

/// Outcome of the find stage
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Groups to resolve, in section then server order
    pub groups: Vec<DuplicateGroup>,
    /// Sections that could not be queried (non-fatal)
    pub errors: Vec<String>,
}

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    pub summary: RunSummary,
    /// Every non-fatal problem: failed sections, deletions and log writes
    pub errors: Vec<String>,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
struct PipelineConfig {
    sections: Vec<LibrarySection>,
    scoring: ScoringConfig,
    skip_list: SkipList,
    policy: Policy,
    filepaths_only: bool,
    deletion_pause: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            scoring: ScoringConfig::default(),
            skip_list: SkipList::default(),
            policy: Policy::Manual,
            filepaths_only: false,
            deletion_pause: DEFAULT_DELETION_PAUSE,
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    library: Box<dyn LibraryClient>,
    recorder: Option<DecisionRecorder>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder working against `library`
    pub fn new(library: Box<dyn LibraryClient>) -> Self {
        Self {
            config: PipelineConfig::default(),
            library,
            recorder: None,
        }
    }

    /// Sections to search, in order
    pub fn sections(mut self, sections: Vec<LibrarySection>) -> Self {
        self.config.sections = sections;
        self
    }

    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    pub fn skip_list(mut self, skip_list: SkipList) -> Self {
        self.config.skip_list = skip_list;
        self
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Only act on groups whose copies share one path; keep the lowest id
    pub fn filepaths_only(mut self, enabled: bool) -> Self {
        self.config.filepaths_only = enabled;
        self
    }

    /// Pause after each deletion request
    pub fn deletion_pause(mut self, pause: Duration) -> Self {
        self.config.deletion_pause = pause;
        self
    }

    /// Append decisions to this log
    pub fn recorder(mut self, recorder: DecisionRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            resolver: Resolver::new(self.config.policy, self.config.filepaths_only),
            config: self.config,
            library: self.library,
            recorder: self.recorder,
        }
    }
}

/// The find / resolve / remove pipeline
pub struct Pipeline {
    config: PipelineConfig,
    resolver: Resolver,
    library: Box<dyn LibraryClient>,
    recorder: Option<DecisionRecorder>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder(library: Box<dyn LibraryClient>) -> PipelineBuilder {
        PipelineBuilder::new(library)
    }

    /// Find, resolve and remove
    pub fn run(&self, prompt: &mut dyn KeeperPrompt, events: &EventSender) -> PipelineResult {
        let start_time = Instant::now();
        events.send(Event::Pipeline(PipelineEvent::Started));

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));
        let scan = self.find_duplicates(events);

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Resolving,
        }));
        let mut result = self.process(&scan.groups, prompt, events);

        let mut errors = scan.errors;
        errors.append(&mut result.errors);
        result.errors = errors;
        result.summary.duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: result.summary.clone(),
        }));
        result
    }

    /// Query every section and build scored duplicate groups.
    ///
    /// A section that cannot be queried is reported and skipped.
    pub fn find_duplicates(&self, events: &EventSender) -> ScanResult {
        let mut result = ScanResult::default();
        events.send(Event::Scan(ScanEvent::Started {
            sections: self.config.sections.iter().map(|s| s.name.clone()).collect(),
        }));

        for section in &self.config.sections {
            let items = match self.library.duplicates(section) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Skipping section {:?}: {}", section.name, e);
                    events.send(Event::Scan(ScanEvent::SectionFailed {
                        section: section.name.clone(),
                        message: e.to_string(),
                    }));
                    result.errors.push(format!("{}: {}", section.name, e));
                    continue;
                }
            };

            let mut found = 0;
            for item in items {
                let title = item.display_title();
                let candidates = item
                    .media
                    .iter()
                    .map(|raw| {
                        let mut media = normalize(raw, item.container_key());
                        if !self.config.filepaths_only {
                            media.score = Some(score(&media, &self.config.scoring));
                        }
                        debug!(id = media.id, score = ?media.score, "Candidate for {:?}", title);
                        media
                    })
                    .collect();
                let group = DuplicateGroup::new(title, section.kind, candidates);

                if self.config.filepaths_only && !group.shares_single_path() {
                    debug!("Copies of {:?} live at different paths", group.title);
                    events.send(Event::Scan(ScanEvent::GroupExcluded { title: group.title }));
                    continue;
                }

                info!("Processing: {:?}", group.title);
                found += 1;
                result.groups.push(group);
            }

            events.send(Event::Scan(ScanEvent::SectionScanned {
                section: section.name.clone(),
                duplicates: found,
            }));
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_groups: result.groups.len(),
        }));
        result
    }

    /// Resolve each group in order and remove the copies not kept
    pub fn process(
        &self,
        groups: &[DuplicateGroup],
        prompt: &mut dyn KeeperPrompt,
        events: &EventSender,
    ) -> PipelineResult {
        let mut summary = RunSummary {
            groups_found: groups.len(),
            ..Default::default()
        };
        let mut errors = Vec::new();

        for group in groups {
            events.send(Event::Resolve(ResolveEvent::GroupStarted {
                title: group.title.clone(),
                candidates: group.candidates.len(),
            }));

            let mut decision = match self.resolver.resolve(group, prompt, events) {
                Resolution::Keep(decision) => decision,
                Resolution::Skip(reason) => {
                    match reason {
                        SkipReason::OperatorSkipped | SkipReason::InvalidSelection { .. } => {
                            summary.groups_skipped += 1
                        }
                        SkipReason::NoViableKeeper => summary.groups_unresolved += 1,
                        SkipReason::NotDuplicate => {}
                    }
                    events.send(Event::Resolve(ResolveEvent::Skipped {
                        title: group.title.clone(),
                        reason,
                    }));
                    continue;
                }
            };

            summary.groups_resolved += 1;
            events.send(Event::Resolve(ResolveEvent::Kept {
                title: group.title.clone(),
                media: decision.keeper().clone(),
            }));

            for (media_id, fragment) in decision.apply_skip_list(&self.config.skip_list) {
                info!(media_id, "Skip list entry {:?} protects this copy", fragment);
                summary.vetoed += 1;
                events.send(Event::Delete(DeleteEvent::Vetoed { media_id, fragment }));
            }

            self.remove(&decision, &mut summary, &mut errors, events);

            if let Some(recorder) = &self.recorder {
                if let Err(e) = recorder.record(&group.title, &decision) {
                    warn!("Failed to record decision for {:?}: {}", group.title, e);
                    errors.push(e.to_string());
                }
            }
        }

        PipelineResult { summary, errors }
    }

    fn remove(
        &self,
        decision: &Decision,
        summary: &mut RunSummary,
        errors: &mut Vec<String>,
        events: &EventSender,
    ) {
        for removal in decision.removals().iter().filter(|r| r.will_delete) {
            let media = &removal.media;
            events.send(Event::Delete(DeleteEvent::Removing {
                media: media.clone(),
            }));

            match self.library.delete_media(&media.container_key, media.id) {
                Ok(()) => {
                    summary.deleted += 1;
                    summary.reclaimed_bytes =
                        summary.reclaimed_bytes.saturating_add(media.file_size_bytes);
                    events.send(Event::Delete(DeleteEvent::Deleted { media_id: media.id }));
                }
                Err(e) => {
                    error!(media_id = media.id, "Failed to remove media: {}", e);
                    summary.delete_failures += 1;
                    errors.push(e.to_string());
                    events.send(Event::Delete(DeleteEvent::Failed {
                        media_id: media.id,
                        message: e.to_string(),
                    }));
                }
            }

            if !self.config.deletion_pause.is_zero() {
                thread::sleep(self.config.deletion_pause);
            }
        }
    }
}
