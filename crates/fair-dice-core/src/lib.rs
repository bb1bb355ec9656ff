//! Fair Dice Core Library
//!
//! This crate provides the provably-fair random value exchange between the
//! computer and a user, and the dice game built on it:
//! - Unbiased bounded sampling from a secure random source
//! - HMAC-SHA256 commit-reveal
//! - The round state machine and its driver
//! - Win probabilities for non-transitive dice

pub mod config;
pub mod crypto;
pub mod dice;
pub mod error;
pub mod game;
pub mod protocol;

pub use config::GameConfig;
pub use crypto::{Commitment, Digest, Reveal, SecretKey, UnbiasedSampler};
pub use dice::{win_probability, DiceSet, Die, ProbabilityTable, WinProbability};
pub use error::{FairError, Result, Violation};
pub use game::{DiceGame, GameEvent, GameOutcome, Player, Side};
pub use protocol::{
    run_round, CommitMessage, Contribution, ContributionSource, FairValueExchange, RevealMessage,
    RoundId, RoundOutcome, RoundResult,
};
