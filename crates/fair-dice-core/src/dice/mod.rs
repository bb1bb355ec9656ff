//! Dice, parsing, and win probabilities.

mod die;
mod probability;
mod table;

pub use die::{DiceSet, Die};
pub use probability::{win_probability, WinProbability};
pub use table::ProbabilityTable;
