//! The contributor side of a round and the round driver.

use super::exchange::FairValueExchange;
use super::messages::{CommitMessage, RevealMessage};
use super::types::{RoundId, RoundResult};
use crate::crypto::UnbiasedSampler;
use crate::error::{FairError, Result};
use rand::{CryptoRng, RngCore};
use std::collections::VecDeque;
use tracing::{info, warn};

/// What the contributor hands back after seeing the digest
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contribution {
    Value(u32),
    /// The contributor walked away; the round never completes.
    Abort,
}

/// Supplies contributions for rounds committed by the other party.
///
/// This is the only suspension point of the protocol. Implementations can
/// be:
/// - a console prompt
/// - ScriptedContributions for testing
pub trait ContributionSource {
    /// Called once the digest is published. Returning an out-of-range value
    /// leads to [`rejected`](Self::rejected) and another call.
    fn contribute(&mut self, commit: &CommitMessage) -> Contribution;

    /// A previous contribution was refused as invalid
    fn rejected(&mut self, _commit: &CommitMessage, _error: &FairError) {}

    /// The round was revealed; the contributor can now verify it
    fn revealed(&mut self, _commit: &CommitMessage, _reveal: &RevealMessage) {}
}

/// How a round ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Completed(RoundResult),
    Aborted(RoundId),
}

impl RoundOutcome {
    pub fn completed(self) -> Option<RoundResult> {
        match self {
            RoundOutcome::Completed(result) => Some(result),
            RoundOutcome::Aborted(_) => None,
        }
    }
}

/// Drive one round: commit, publish, wait for a valid contribution, reveal.
pub fn run_round<R, S>(
    range: u32,
    sampler: &mut UnbiasedSampler<R>,
    source: &mut S,
) -> Result<RoundOutcome>
where
    R: RngCore + CryptoRng,
    S: ContributionSource + ?Sized,
{
    let mut round = FairValueExchange::new(range)?;
    let digest = round.commit(sampler)?;
    let commit = CommitMessage {
        round_id: round.id(),
        range,
        digest,
    };

    loop {
        match source.contribute(&commit) {
            Contribution::Abort => {
                warn!(round = %commit.round_id, "round aborted by contributor");
                return Ok(RoundOutcome::Aborted(commit.round_id));
            }
            Contribution::Value(value) => match round.accept_contribution(value) {
                Ok(()) => break,
                Err(e) if e.is_recoverable() => {
                    warn!(round = %commit.round_id, value, "contribution rejected: {}", e);
                    source.rejected(&commit, &e);
                }
                Err(e) => return Err(e),
            },
        }
    }

    let result = round.reveal()?;
    info!(
        round = %commit.round_id,
        range,
        final_value = result.final_value,
        "round completed"
    );
    source.revealed(&commit, &RevealMessage::from(&result));
    Ok(RoundOutcome::Completed(result))
}

/// Replays a fixed list of contributions and records what it saw.
/// Aborts once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedContributions {
    script: VecDeque<Contribution>,
    commits: Vec<CommitMessage>,
    reveals: Vec<RevealMessage>,
    rejections: usize,
}

impl ScriptedContributions {
    pub fn new(script: impl IntoIterator<Item = Contribution>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Convenience for a script of plain values
    pub fn values(values: impl IntoIterator<Item = u32>) -> Self {
        Self::new(values.into_iter().map(Contribution::Value))
    }

    pub fn commits(&self) -> &[CommitMessage] {
        &self.commits
    }

    pub fn reveals(&self) -> &[RevealMessage] {
        &self.reveals
    }

    pub fn rejections(&self) -> usize {
        self.rejections
    }
}

impl ContributionSource for ScriptedContributions {
    fn contribute(&mut self, commit: &CommitMessage) -> Contribution {
        if self.commits.last() != Some(commit) {
            self.commits.push(commit.clone());
        }
        self.script.pop_front().unwrap_or(Contribution::Abort)
    }

    fn rejected(&mut self, _commit: &CommitMessage, _error: &FairError) {
        self.rejections += 1;
    }

    fn revealed(&mut self, _commit: &CommitMessage, reveal: &RevealMessage) {
        self.reveals.push(reveal.clone());
    }
}
