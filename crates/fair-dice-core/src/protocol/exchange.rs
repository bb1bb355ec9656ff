//! One round of the fair value exchange.
//!
//! The committer picks a secret in `[0, range)`, publishes only its digest,
//! accepts the other party's contribution, then reveals. The agreed value
//! is `(secret + contribution) mod range`.

use super::types::{combine, RoundId, RoundPhase, RoundResult};
use crate::crypto::{rejection_limit, Commitment, Digest, UnbiasedSampler};
use crate::error::{FairError, Result, Violation};
use rand::{CryptoRng, RngCore};
use std::num::NonZeroU32;
use tracing::debug;

enum State {
    Created,
    /// `contribution` is `None` until the other party has answered
    Committed {
        commitment: Commitment,
        contribution: Option<u32>,
    },
    Revealed(RoundResult),
}

/// Committer-side state machine for a single round.
///
/// A round is never reused: every `FairValueExchange` owns exactly one
/// secret and one key.
pub struct FairValueExchange {
    id: RoundId,
    range: NonZeroU32,
    state: State,
}

impl FairValueExchange {
    /// Start a round over `[0, range)`
    pub fn new(range: u32) -> Result<Self> {
        rejection_limit(range)?;
        let range = NonZeroU32::new(range)
            .ok_or_else(|| FairError::invalid("range must be a positive integer"))?;
        Ok(Self {
            id: RoundId::new(),
            range,
            state: State::Created,
        })
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn phase(&self) -> RoundPhase {
        match self.state {
            State::Created => RoundPhase::Created,
            State::Committed {
                contribution: None, ..
            } => RoundPhase::Committed,
            State::Committed {
                contribution: Some(_),
                ..
            } => RoundPhase::ContributionReceived,
            State::Revealed(_) => RoundPhase::Revealed,
        }
    }

    /// The published digest, once committed
    pub fn digest(&self) -> Option<Digest> {
        match &self.state {
            State::Committed { commitment, .. } => Some(commitment.digest()),
            State::Revealed(result) => Some(result.digest),
            State::Created => None,
        }
    }

    /// Pick the secret, bind it under a fresh key, and return the digest to
    /// publish. Allowed once per round.
    pub fn commit<R: RngCore + CryptoRng>(
        &mut self,
        sampler: &mut UnbiasedSampler<R>,
    ) -> Result<Digest> {
        if !matches!(self.state, State::Created) {
            return Err(Violation::CommitmentReused.into());
        }
        let secret = sampler.sample(self.range.get())?;
        let commitment = Commitment::commit(secret, sampler)?;
        let digest = commitment.digest();
        debug!(round = %self.id, range = self.range.get(), %digest, "committed");
        self.state = State::Committed {
            commitment,
            contribution: None,
        };
        Ok(digest)
    }

    /// Accept the other party's contribution in `[0, range)`.
    ///
    /// An out-of-range value is an `InvalidArgument` and leaves the round
    /// waiting, so the caller may ask again.
    pub fn accept_contribution(&mut self, contribution: u32) -> Result<()> {
        let range = self.range.get();
        let slot = match &mut self.state {
            State::Created => return Err(Violation::ContributionBeforeCommit.into()),
            State::Committed {
                contribution: Some(_),
                ..
            } => return Err(Violation::DuplicateContribution.into()),
            State::Revealed(_) => return Err(Violation::ContributionAfterReveal.into()),
            State::Committed { contribution, .. } => contribution,
        };
        if contribution >= range {
            return Err(FairError::invalid(format!(
                "contribution {contribution} is outside 0..{range}"
            )));
        }
        *slot = Some(contribution);
        debug!(round = %self.id, contribution, "contribution accepted");
        Ok(())
    }

    /// Reveal the secret and key and compute the final value.
    ///
    /// Calling it again after a successful reveal returns the same result.
    pub fn reveal(&mut self) -> Result<RoundResult> {
        let result = match &self.state {
            State::Created
            | State::Committed {
                contribution: None, ..
            } => return Err(Violation::RevealBeforeContribution.into()),
            State::Revealed(result) => return Ok(result.clone()),
            State::Committed {
                commitment,
                contribution: Some(contribution),
            } => {
                let reveal = commitment.reveal();
                RoundResult {
                    round_id: self.id,
                    range: self.range.get(),
                    digest: commitment.digest(),
                    contribution: *contribution,
                    final_value: combine(reveal.value, *contribution, self.range),
                    reveal,
                }
            }
        };
        debug!(
            round = %self.id,
            secret = result.reveal.value,
            contribution = result.contribution,
            final_value = result.final_value,
            "revealed"
        );
        self.state = State::Revealed(result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sampler::test_rng::ScriptedRng;

    fn committed(range: u32) -> FairValueExchange {
        let mut round = FairValueExchange::new(range).unwrap();
        round.commit(&mut UnbiasedSampler::os()).unwrap();
        round
    }

    #[test]
    fn test_full_round() {
        let mut round = FairValueExchange::new(6).unwrap();
        assert_eq!(round.phase(), RoundPhase::Created);
        assert!(round.digest().is_none());

        let digest = round.commit(&mut UnbiasedSampler::os()).unwrap();
        assert_eq!(round.phase(), RoundPhase::Committed);
        assert_eq!(round.digest(), Some(digest));

        round.accept_contribution(4).unwrap();
        assert_eq!(round.phase(), RoundPhase::ContributionReceived);

        let result = round.reveal().unwrap();
        assert_eq!(round.phase(), RoundPhase::Revealed);
        assert_eq!(result.digest, digest);
        assert_eq!(result.final_value, (result.secret_value() + 4) % 6);
        assert!(result.secret_value() < 6);
        assert!(result.verify().is_ok());
    }

    #[test]
    fn test_secret_comes_from_sampler() {
        // First draw 65533 is rejected for range 6, second gives 9 % 6 = 3.
        let mut sampler = UnbiasedSampler::new(ScriptedRng::new(&[65533, 9]));
        let mut round = FairValueExchange::new(6).unwrap();
        round.commit(&mut sampler).unwrap();
        round.accept_contribution(5).unwrap();

        let result = round.reveal().unwrap();
        assert_eq!(result.secret_value(), 3);
        assert_eq!(result.final_value, 2);
    }

    #[test]
    fn test_zero_range_rejected() {
        assert!(matches!(
            FairValueExchange::new(0),
            Err(FairError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_contribution_before_commit() {
        let mut round = FairValueExchange::new(6).unwrap();
        assert!(matches!(
            round.accept_contribution(1),
            Err(FairError::ProtocolViolation(Violation::ContributionBeforeCommit))
        ));
        assert_eq!(round.phase(), RoundPhase::Created);
    }

    #[test]
    fn test_reveal_before_contribution() {
        let mut fresh = FairValueExchange::new(6).unwrap();
        assert!(matches!(
            fresh.reveal(),
            Err(FairError::ProtocolViolation(Violation::RevealBeforeContribution))
        ));

        let mut round = committed(6);
        assert!(matches!(
            round.reveal(),
            Err(FairError::ProtocolViolation(Violation::RevealBeforeContribution))
        ));
        // The round is still usable after the rejected reveal.
        assert_eq!(round.phase(), RoundPhase::Committed);
        round.accept_contribution(0).unwrap();
        assert!(round.reveal().is_ok());
    }

    #[test]
    fn test_recommit_rejected() {
        let mut round = committed(6);
        let digest = round.digest();
        assert!(matches!(
            round.commit(&mut UnbiasedSampler::os()),
            Err(FairError::ProtocolViolation(Violation::CommitmentReused))
        ));
        assert_eq!(round.digest(), digest);

        round.accept_contribution(2).unwrap();
        assert!(matches!(
            round.commit(&mut UnbiasedSampler::os()),
            Err(FairError::ProtocolViolation(Violation::CommitmentReused))
        ));
    }

    #[test]
    fn test_duplicate_and_late_contributions() {
        let mut round = committed(6);
        round.accept_contribution(2).unwrap();
        assert!(matches!(
            round.accept_contribution(3),
            Err(FairError::ProtocolViolation(Violation::DuplicateContribution))
        ));

        round.reveal().unwrap();
        assert!(matches!(
            round.accept_contribution(3),
            Err(FairError::ProtocolViolation(Violation::ContributionAfterReveal))
        ));
    }

    #[test]
    fn test_out_of_range_contribution_can_be_retried() {
        let mut round = committed(6);
        assert!(matches!(
            round.accept_contribution(6),
            Err(FairError::InvalidArgument(_))
        ));
        assert_eq!(round.phase(), RoundPhase::Committed);
        round.accept_contribution(5).unwrap();
    }

    #[test]
    fn test_reveal_twice_is_idempotent() {
        let mut round = committed(2);
        round.accept_contribution(1).unwrap();
        let first = round.reveal().unwrap();
        let second = round.reveal().unwrap();
        assert_eq!(first, second);
    }
}
