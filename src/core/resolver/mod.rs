//! # Resolver Module
//!
//! Chooses which copy of a duplicated title to keep.
//!
//! ## Policies
//! | Policy    | Scored mode                         | Filepath-only mode |
//! |-----------|-------------------------------------|--------------------|
//! | Automatic | highest score above 0, first on tie | lowest media id    |
//! | Manual    | operator picks from score ranking   | operator picks from id ranking |
//!
//! ## Group lifecycle
//! `Scored -> AwaitingSelection -> Resolved`. Under the manual policy the
//! operator answers with a 1-based position, `0` to skip, or `b`/`best` for
//! position 1. Anything else skips the group: nothing is deleted and
//! nothing is recorded.

mod group;
mod traits;

pub use group::DuplicateGroup;
pub use traits::{KeeperPrompt, NoPrompt, ScriptedPrompt};

use crate::core::media::MediaInfo;
use crate::core::skiplist::SkipList;
use crate::events::{Event, EventSender, ResolveEvent, SkipReason};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How a keeper is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Ask the operator for every group
    #[default]
    Manual,
    /// Keep the best copy without asking
    Automatic,
}

/// A parsed operator answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// `0`: leave the group alone
    Skip,
    /// `b` or `best`: position 1
    Best,
    /// 1-based position in the ranking
    Position(usize),
}

impl Selection {
    /// Parse an answer for a ranking of `count` candidates.
    /// `None` means the answer is not a valid choice.
    pub fn parse(input: &str, count: usize) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("b") || input.eq_ignore_ascii_case("best") {
            return Some(Selection::Best);
        }
        match input.parse::<usize>().ok()? {
            0 => Some(Selection::Skip),
            n if n <= count => Some(Selection::Position(n)),
            _ => None,
        }
    }
}

/// A copy that is not kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub media: MediaInfo,
    /// Cleared when the skip list protects this copy
    pub will_delete: bool,
}

impl Removal {
    pub fn new(media: MediaInfo) -> Self {
        Self {
            media,
            will_delete: true,
        }
    }
}

/// Outcome of resolving one group: one keeper, every other copy removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    keeper: MediaInfo,
    removals: Vec<Removal>,
}

impl Decision {
    pub fn new(keeper: MediaInfo, removals: Vec<Removal>) -> Self {
        Self { keeper, removals }
    }

    /// Keep `candidates[keeper]`; the rest become removals in group order.
    fn from_candidates(candidates: &[MediaInfo], keeper: usize) -> Self {
        let removals = candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != keeper)
            .map(|(_, media)| Removal::new(media.clone()))
            .collect();
        Self::new(candidates[keeper].clone(), removals)
    }

    pub fn keeper(&self) -> &MediaInfo {
        &self.keeper
    }

    pub fn keeper_id(&self) -> u64 {
        self.keeper.id
    }

    pub fn removals(&self) -> &[Removal] {
        &self.removals
    }

    /// Clear `will_delete` on every removal the skip list protects.
    /// Returns the protected ids with the fragment that matched.
    pub fn apply_skip_list(&mut self, skip_list: &SkipList) -> Vec<(u64, String)> {
        let mut vetoed = Vec::new();
        for removal in &mut self.removals {
            if let Some(fragment) = skip_list.matching_fragment(&removal.media.files) {
                removal.will_delete = false;
                vetoed.push((removal.media.id, fragment.to_string()));
            }
        }
        vetoed
    }
}

/// What happened to a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A keeper was chosen
    Keep(Decision),
    /// No keeper; nothing is deleted or recorded
    Skip(SkipReason),
}

/// Applies a [`Policy`] to duplicate groups
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    policy: Policy,
    filepaths_only: bool,
}

impl Resolver {
    pub fn new(policy: Policy, filepaths_only: bool) -> Self {
        Self {
            policy,
            filepaths_only,
        }
    }

    /// Candidates in selection order: score descending, or id ascending in
    /// filepath-only mode. Ties keep group order.
    pub fn rank<'a>(&self, candidates: &'a [MediaInfo]) -> Vec<&'a MediaInfo> {
        let mut ranked: Vec<&MediaInfo> = candidates.iter().collect();
        if self.filepaths_only {
            ranked.sort_by_key(|c| c.id);
        } else {
            ranked.sort_by(|a, b| b.score.cmp(&a.score));
        }
        ranked
    }

    /// Resolve one group. Never fails: every problem becomes a skip.
    pub fn resolve(
        &self,
        group: &DuplicateGroup,
        prompt: &mut dyn KeeperPrompt,
        events: &EventSender,
    ) -> Resolution {
        if !group.is_duplicate() {
            return Resolution::Skip(SkipReason::NotDuplicate);
        }

        let keeper = match self.policy {
            Policy::Automatic => {
                info!("Determining best media item to keep for {:?}", group.title);
                self.automatic_keeper(&group.candidates)
                    .ok_or(SkipReason::NoViableKeeper)
            }
            Policy::Manual => self.manual_keeper(group, prompt, events),
        };

        match keeper {
            Ok(index) => {
                let decision = Decision::from_candidates(&group.candidates, index);
                info!(
                    keeper = decision.keeper_id(),
                    removals = decision.removals().len(),
                    "Keeping media item for {:?}",
                    group.title
                );
                Resolution::Keep(decision)
            }
            Err(reason) => {
                warn!("Not resolving {:?}: {}", group.title, reason);
                Resolution::Skip(reason)
            }
        }
    }

    /// Index of the copy the automatic policy keeps
    pub fn automatic_keeper(&self, candidates: &[MediaInfo]) -> Option<usize> {
        if self.filepaths_only {
            return candidates
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.id)
                .map(|(i, _)| i);
        }

        // strict comparison: the first copy reaching the top score wins
        let mut best: Option<(usize, i64)> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            let score = candidate.score.unwrap_or(0);
            if score > best.map_or(0, |(_, top)| top) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }

    fn manual_keeper(
        &self,
        group: &DuplicateGroup,
        prompt: &mut dyn KeeperPrompt,
        events: &EventSender,
    ) -> Result<usize, SkipReason> {
        let ranked = self.rank(&group.candidates);
        events.send(Event::Resolve(ResolveEvent::AwaitingSelection {
            title: group.title.clone(),
            candidates: ranked.iter().map(|c| (*c).clone()).collect(),
            scored: !self.filepaths_only,
        }));

        let answer = match prompt.ask(&group.title, &ranked) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Could not read a choice for {:?}: {}", group.title, e);
                return Err(SkipReason::InvalidSelection {
                    input: String::new(),
                });
            }
        };

        let chosen = match Selection::parse(&answer, ranked.len()) {
            Some(Selection::Skip) => return Err(SkipReason::OperatorSkipped),
            Some(Selection::Best) => ranked[0],
            Some(Selection::Position(n)) => ranked[n - 1],
            None => {
                return Err(SkipReason::InvalidSelection {
                    input: answer.trim().to_string(),
                })
            }
        };

        group
            .candidates
            .iter()
            .position(|c| std::ptr::eq(c, chosen))
            .ok_or(SkipReason::InvalidSelection { input: answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::media::MediaKind;
    use crate::events::null_sender;

    fn scored(id: u64, score: i64) -> MediaInfo {
        MediaInfo {
            id,
            files: vec![format!("/movies/Heat/Heat.{}.mkv", id)],
            score: Some(score),
            ..Default::default()
        }
    }

    fn group(candidates: Vec<MediaInfo>) -> DuplicateGroup {
        DuplicateGroup::new("Heat", MediaKind::Movie, candidates)
    }

    fn keep(resolution: Resolution) -> Decision {
        match resolution {
            Resolution::Keep(decision) => decision,
            Resolution::Skip(reason) => panic!("expected a keeper, got skip: {}", reason),
        }
    }

    #[test]
    fn automatic_keeps_highest_score() {
        let resolver = Resolver::new(Policy::Automatic, false);
        let decision = keep(resolver.resolve(
            &group(vec![scored(1, 500), scored(2, 900), scored(3, 100)]),
            &mut NoPrompt,
            &null_sender(),
        ));

        assert_eq!(decision.keeper_id(), 2);
        let removed: Vec<u64> = decision.removals().iter().map(|r| r.media.id).collect();
        assert_eq!(removed, vec![1, 3]);
        assert!(decision.removals().iter().all(|r| r.will_delete));
    }

    #[test]
    fn automatic_tie_goes_to_first_in_group_order() {
        let resolver = Resolver::new(Policy::Automatic, false);
        let decision = keep(resolver.resolve(
            &group(vec![scored(9, 100), scored(3, 700), scored(1, 700)]),
            &mut NoPrompt,
            &null_sender(),
        ));
        assert_eq!(decision.keeper_id(), 3);
    }

    #[test]
    fn automatic_without_positive_score_is_unresolved() {
        let resolver = Resolver::new(Policy::Automatic, false);
        let resolution = resolver.resolve(
            &group(vec![scored(1, 0), scored(2, -50)]),
            &mut NoPrompt,
            &null_sender(),
        );
        assert_eq!(resolution, Resolution::Skip(SkipReason::NoViableKeeper));
    }

    #[test]
    fn automatic_filepath_mode_keeps_lowest_id() {
        let resolver = Resolver::new(Policy::Automatic, true);
        let mut candidates = vec![scored(42, 0), scored(7, 0), scored(19, 0)];
        for c in &mut candidates {
            c.score = None;
        }
        let decision = keep(resolver.resolve(&group(candidates), &mut NoPrompt, &null_sender()));
        assert_eq!(decision.keeper_id(), 7);
    }

    #[test]
    fn single_copy_needs_no_action() {
        for policy in [Policy::Automatic, Policy::Manual] {
            let resolver = Resolver::new(policy, false);
            let mut prompt = ScriptedPrompt::new(["1"]);
            let resolution = resolver.resolve(&group(vec![scored(1, 100)]), &mut prompt, &null_sender());
            assert_eq!(resolution, Resolution::Skip(SkipReason::NotDuplicate));
            assert!(prompt.asked().is_empty());
        }
    }

    #[test]
    fn manual_position_refers_to_ranking() {
        let resolver = Resolver::new(Policy::Manual, false);
        let mut prompt = ScriptedPrompt::new(["2"]);
        // ranking: 2 (900), 1 (500), 3 (100)
        let decision = keep(resolver.resolve(
            &group(vec![scored(1, 500), scored(2, 900), scored(3, 100)]),
            &mut prompt,
            &null_sender(),
        ));
        assert_eq!(decision.keeper_id(), 1);
    }

    #[test]
    fn manual_best_alias_picks_top_of_ranking() {
        let resolver = Resolver::new(Policy::Manual, false);
        for answer in ["b", "B", "best", " b\n"] {
            let mut prompt = ScriptedPrompt::new([answer]);
            let decision = keep(resolver.resolve(
                &group(vec![scored(1, 500), scored(2, 900)]),
                &mut prompt,
                &null_sender(),
            ));
            assert_eq!(decision.keeper_id(), 2);
        }
    }

    #[test]
    fn manual_zero_skips_group() {
        let resolver = Resolver::new(Policy::Manual, false);
        let mut prompt = ScriptedPrompt::new(["0"]);
        let resolution = resolver.resolve(
            &group(vec![scored(1, 500), scored(2, 900)]),
            &mut prompt,
            &null_sender(),
        );
        assert_eq!(resolution, Resolution::Skip(SkipReason::OperatorSkipped));
    }

    #[test]
    fn manual_invalid_answers_skip_group() {
        let resolver = Resolver::new(Policy::Manual, false);
        for answer in ["3", "-1", "one", "", "1.5"] {
            let mut prompt = ScriptedPrompt::new([answer]);
            let resolution = resolver.resolve(
                &group(vec![scored(1, 500), scored(2, 900)]),
                &mut prompt,
                &null_sender(),
            );
            assert!(
                matches!(resolution, Resolution::Skip(SkipReason::InvalidSelection { .. })),
                "answer {:?} should be rejected",
                answer
            );
        }
    }

    #[test]
    fn manual_unreadable_answer_skips_group() {
        let resolver = Resolver::new(Policy::Manual, false);
        let resolution = resolver.resolve(
            &group(vec![scored(1, 500), scored(2, 900)]),
            &mut NoPrompt,
            &null_sender(),
        );
        assert!(matches!(resolution, Resolution::Skip(SkipReason::InvalidSelection { .. })));
    }

    #[test]
    fn manual_filepath_mode_ranks_by_id() {
        let resolver = Resolver::new(Policy::Manual, true);
        let mut prompt = ScriptedPrompt::new(["b"]);
        let decision = keep(resolver.resolve(
            &group(vec![scored(30, 900), scored(10, 100), scored(20, 500)]),
            &mut prompt,
            &null_sender(),
        ));
        assert_eq!(decision.keeper_id(), 10);
    }

    #[test]
    fn ranking_is_stable_for_equal_scores() {
        let resolver = Resolver::new(Policy::Manual, false);
        let candidates = vec![scored(5, 100), scored(4, 300), scored(3, 100)];
        let ids: Vec<u64> = resolver.rank(&candidates).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 5, 3]);
    }

    #[test]
    fn awaiting_selection_event_carries_ranking() {
        use crate::events::EventChannel;

        let (sender, receiver) = EventChannel::new();
        let resolver = Resolver::new(Policy::Manual, false);
        let mut prompt = ScriptedPrompt::new(["0"]);
        resolver.resolve(&group(vec![scored(1, 10), scored(2, 20)]), &mut prompt, &sender);
        drop(sender);

        let ranked = receiver
            .iter()
            .find_map(|event| match event {
                Event::Resolve(ResolveEvent::AwaitingSelection {
                    candidates,
                    scored: is_scored,
                    ..
                }) => {
                    assert!(is_scored);
                    Some(candidates.iter().map(|c| c.id).collect::<Vec<_>>())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(ranked, vec![2, 1]);
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(Selection::parse("0", 3), Some(Selection::Skip));
        assert_eq!(Selection::parse("3", 3), Some(Selection::Position(3)));
        assert_eq!(Selection::parse("4", 3), None);
        assert_eq!(Selection::parse("best", 3), Some(Selection::Best));
        assert_eq!(Selection::parse("keep", 3), None);
    }

    #[test]
    fn skip_list_clears_will_delete() {
        let mut decision = Decision::new(
            scored(1, 10),
            vec![
                Removal::new(scored(2, 5)),
                Removal::new(MediaInfo {
                    id: 3,
                    files: vec!["/Protected/Heat.mkv".to_string()],
                    ..Default::default()
                }),
            ],
        );

        let vetoed = decision.apply_skip_list(&SkipList::new(["/protected/"]));

        assert_eq!(vetoed, vec![(3, "/protected/".to_string())]);
        assert!(decision.removals()[0].will_delete);
        assert!(!decision.removals()[1].will_delete);
    }
}
