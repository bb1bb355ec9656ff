//! Error types shared by every layer of the core.

use thiserror::Error;

/// Ordering defects in a fair value exchange round.
///
/// These are never caused by user input; they indicate the orchestrator
/// drove the protocol out of order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("a commitment was already made for this round")]
    CommitmentReused,

    #[error("contribution received before any commitment was published")]
    ContributionBeforeCommit,

    #[error("a contribution was already accepted for this round")]
    DuplicateContribution,

    #[error("contribution received after the secret was revealed")]
    ContributionAfterReveal,

    #[error("reveal requested before a contribution was accepted")]
    RevealBeforeContribution,

    #[error("revealed value and key do not reproduce the published digest")]
    DigestMismatch,

    #[error("reveal belongs to a different round than the commitment")]
    RoundMismatch,

    #[error("final value does not equal (secret + contribution) mod range")]
    FinalValueMismatch,
}

/// Errors from the fair dice core
#[derive(Debug, Error)]
pub enum FairError {
    /// Caller supplied a bad range, die, or contribution. Recoverable by
    /// asking again.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Fatal to the round in progress.
    #[error("protocol violation: {0}")]
    ProtocolViolation(#[from] Violation),

    /// The secure random source could not be read.
    #[error("entropy source unavailable: {0}")]
    EntropyFailure(#[from] rand::Error),

    #[error("HMAC key rejected: {0}")]
    Mac(#[from] hmac::digest::InvalidLength),
}

impl FairError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FairError::InvalidArgument(msg.into())
    }

    /// Can the orchestrator recover by prompting again?
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FairError::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, FairError>;
