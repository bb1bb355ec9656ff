//! Scripted player for driving games without a terminal.

use super::traits::Player;
use super::types::{DieChoice, GameEvent};
use crate::dice::DiceSet;
use crate::error::FairError;
use crate::protocol::{
    CommitMessage, Contribution, ContributionSource, RevealMessage, ScriptedContributions,
};
use std::collections::VecDeque;

/// Replays fixed contributions and die choices and records every event.
/// Aborts once either script runs out.
#[derive(Debug, Default)]
pub struct ScriptedPlayer {
    contributions: ScriptedContributions,
    choices: VecDeque<DieChoice>,
    events: Vec<GameEvent>,
}

impl ScriptedPlayer {
    pub fn new(
        contributions: impl IntoIterator<Item = u32>,
        choices: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            contributions: ScriptedContributions::values(contributions),
            choices: choices.into_iter().map(DieChoice::Index).collect(),
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn contributions(&self) -> &ScriptedContributions {
        &self.contributions
    }
}

impl ContributionSource for ScriptedPlayer {
    fn contribute(&mut self, commit: &CommitMessage) -> Contribution {
        self.contributions.contribute(commit)
    }

    fn rejected(&mut self, commit: &CommitMessage, error: &FairError) {
        self.contributions.rejected(commit, error);
    }

    fn revealed(&mut self, commit: &CommitMessage, reveal: &RevealMessage) {
        self.contributions.revealed(commit, reveal);
    }
}

impl Player for ScriptedPlayer {
    fn choose_die(&mut self, _dice: &DiceSet, _available: &[usize]) -> DieChoice {
        self.choices.pop_front().unwrap_or(DieChoice::Abort)
    }

    fn observe(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
