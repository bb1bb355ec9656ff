//! Game orchestration on top of the fair value exchange.

mod dice_game;
mod scripted;
mod traits;
mod types;

pub use dice_game::DiceGame;
pub use scripted::ScriptedPlayer;
pub use traits::Player;
pub use types::{DieChoice, GameEvent, GameOutcome, RoundPurpose, Side};
