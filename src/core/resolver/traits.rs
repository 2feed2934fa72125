//! Trait definitions for asking the operator which copy to keep.

use crate::core::media::MediaInfo;
use std::collections::VecDeque;
use std::io;

/// Source of the operator's answer under the manual policy.
///
/// The candidate table itself is published as a
/// `ResolveEvent::AwaitingSelection` event before `ask` is called, so an
/// implementation only has to collect the answer.
pub trait KeeperPrompt {
    /// Return the raw answer: a 1-based position, `0` or the best alias.
    fn ask(&mut self, title: &str, ranked: &[&MediaInfo]) -> io::Result<String>;
}

/// Prompt for unattended runs. Every question fails, which skips the group.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl KeeperPrompt for NoPrompt {
    fn ask(&mut self, title: &str, _ranked: &[&MediaInfo]) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no operator available to choose a keeper for {:?}", title),
        ))
    }
}

/// Replays a fixed list of answers in order
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Titles that were asked about, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl KeeperPrompt for ScriptedPrompt {
    fn ask(&mut self, title: &str, _ranked: &[&MediaInfo]) -> io::Result<String> {
        self.asked.push(title.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_prompt_replays_in_order() {
        let mut prompt = ScriptedPrompt::new(["2", "b"]);
        assert_eq!(prompt.ask("A", &[]).unwrap(), "2");
        assert_eq!(prompt.ask("B", &[]).unwrap(), "b");
        assert!(prompt.ask("C", &[]).is_err());
        assert_eq!(prompt.asked(), ["A", "B", "C"]);
    }

    #[test]
    fn no_prompt_always_fails() {
        assert!(NoPrompt.ask("Heat", &[]).is_err());
    }
}
