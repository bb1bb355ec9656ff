//! Protocol messages.
//!
//! [`CommitMessage`] is everything the contributor sees before the reveal.
//! [`RevealMessage`] carries enough for anyone to recompute the digest and
//! the final value.

use super::types::{check_final_value, RoundId, RoundResult};
use crate::crypto::{Digest, Reveal};
use crate::error::{Result, Violation};
use serde::{Deserialize, Serialize};

/// Phase 1: committer publishes the digest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub round_id: RoundId,
    pub range: u32,
    pub digest: Digest,
}

/// Phase 3: committer discloses secret and key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealMessage {
    pub round_id: RoundId,
    #[serde(flatten)]
    pub reveal: Reveal,
    pub contribution: u32,
    pub final_value: u32,
}

impl From<&RoundResult> for CommitMessage {
    fn from(result: &RoundResult) -> Self {
        Self {
            round_id: result.round_id,
            range: result.range,
            digest: result.digest,
        }
    }
}

impl From<&RoundResult> for RevealMessage {
    fn from(result: &RoundResult) -> Self {
        Self {
            round_id: result.round_id,
            reveal: result.reveal.clone(),
            contribution: result.contribution,
            final_value: result.final_value,
        }
    }
}

impl RevealMessage {
    /// Verify this reveal against the commit message seen before contributing
    pub fn verify(&self, commit: &CommitMessage) -> Result<()> {
        if self.round_id != commit.round_id {
            return Err(Violation::RoundMismatch.into());
        }
        self.reveal.verify(&commit.digest)?;
        check_final_value(
            self.reveal.value,
            self.contribution,
            commit.range,
            self.final_value,
        )
    }
}
