//! Game types and events.

use crate::dice::Die;
use crate::protocol::RoundResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which party a die or roll belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    User,
    Computer,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::User => write!(f, "user"),
            Side::Computer => write!(f, "computer"),
        }
    }
}

/// Why a fair round is being run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPurpose {
    /// Range 2; a correct guess lets the user pick first
    FirstMove,
    /// Range is the face count of `side`'s die
    Roll(Side),
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    UserWins,
    ComputerWins,
    Draw,
    /// The user left before the game finished
    Aborted,
}

impl GameOutcome {
    /// Compare the two rolled faces
    pub fn from_faces(user: i64, computer: i64) -> Self {
        match user.cmp(&computer) {
            std::cmp::Ordering::Greater => GameOutcome::UserWins,
            std::cmp::Ordering::Less => GameOutcome::ComputerWins,
            std::cmp::Ordering::Equal => GameOutcome::Draw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameOutcome::UserWins => "You win!",
            GameOutcome::ComputerWins => "Computer wins!",
            GameOutcome::Draw => "Draw",
            GameOutcome::Aborted => "Aborted",
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The player's answer to "choose your die"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DieChoice {
    Index(usize),
    Abort,
}

/// Everything the player is told during a game, in order
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// A round is about to commit; its digest follows in the contribution
    /// request
    RoundStarted { purpose: RoundPurpose, range: u32 },
    FirstMove { result: RoundResult, first: Side },
    DieChosen { side: Side, index: usize, die: Die },
    DieRejected { index: usize },
    Rolled {
        side: Side,
        result: RoundResult,
        face: i64,
    },
    Finished {
        user: i64,
        computer: i64,
        outcome: GameOutcome,
    },
    Aborted,
}
