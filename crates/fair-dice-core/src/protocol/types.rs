//! Protocol types.

use crate::crypto::{Digest, Reveal};
use crate::error::{FairError, Result, Violation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use uuid::Uuid;

/// Unique round identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(Uuid);

impl RoundId {
    /// Create a new random round ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoundId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RoundId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoundId({})", self.0)
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a round stands in `Created → Committed → ContributionReceived → Revealed`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Created,
    Committed,
    ContributionReceived,
    Revealed,
}

/// Outcome of a completed round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_id: RoundId,
    pub range: u32,
    /// Digest published before the contribution was accepted
    pub digest: Digest,
    pub contribution: u32,
    pub reveal: Reveal,
    /// `(secret + contribution) mod range`
    pub final_value: u32,
}

impl RoundResult {
    pub fn secret_value(&self) -> u32 {
        self.reveal.value
    }

    /// Recheck the digest and the combination, as an independent verifier would.
    pub fn verify(&self) -> Result<()> {
        self.reveal.verify(&self.digest)?;
        check_final_value(self.reveal.value, self.contribution, self.range, self.final_value)
    }
}

/// `(secret + contribution) mod range`
pub fn combine(secret: u32, contribution: u32, range: NonZeroU32) -> u32 {
    let sum = u64::from(secret) + u64::from(contribution);
    // The remainder is below `range`, so it fits.
    (sum % u64::from(range.get())) as u32
}

/// Recompute the final value from a reveal as received
pub(crate) fn check_final_value(
    secret: u32,
    contribution: u32,
    range: u32,
    final_value: u32,
) -> Result<()> {
    let range = NonZeroU32::new(range)
        .ok_or_else(|| FairError::invalid("range must be a positive integer"))?;
    if combine(secret, contribution, range) != final_value {
        return Err(Violation::FinalValueMismatch.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_id_generation() {
        let id1 = RoundId::new();
        let id2 = RoundId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_round_id_parse() {
        let id = RoundId::new();
        let parsed: RoundId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_combine_is_bijection_in_contribution() {
        for range in [2u32, 6, 7, 12] {
            for secret in 0..range {
                let nonzero = NonZeroU32::new(range).unwrap();
                let mut seen: Vec<u32> = (0..range)
                    .map(|c| combine(secret, c, nonzero))
                    .collect();
                seen.sort_unstable();
                assert_eq!(seen, (0..range).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_combine_does_not_overflow() {
        let expected = (2 * u64::from(u32::MAX)) % 7;
        let seven = NonZeroU32::new(7).unwrap();
        assert_eq!(combine(u32::MAX, u32::MAX, seven), expected as u32);
    }

    #[test]
    fn test_check_final_value() {
        assert!(check_final_value(4, 5, 6, 3).is_ok());
        assert!(matches!(
            check_final_value(4, 5, 6, 2),
            Err(FairError::ProtocolViolation(Violation::FinalValueMismatch))
        ));
        assert!(matches!(
            check_final_value(1, 1, 0, 0),
            Err(FairError::InvalidArgument(_))
        ));
    }
}
