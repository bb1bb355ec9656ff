//! Protocol types, messages, and the round state machine.

mod contribution;
mod exchange;
mod messages;
mod types;

pub use contribution::{
    run_round, Contribution, ContributionSource, RoundOutcome, ScriptedContributions,
};
pub use exchange::FairValueExchange;
pub use messages::{CommitMessage, RevealMessage};
pub use types::{combine, RoundId, RoundPhase, RoundResult};
