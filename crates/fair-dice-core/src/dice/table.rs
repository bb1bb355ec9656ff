//! Matrix of pairwise win probabilities, shown as the in-game help.

use super::die::{DiceSet, Die};
use super::probability::{win_probability, WinProbability};

/// `cells[i][j]` is the chance that die `i` beats die `j`, diagonal included.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityTable {
    dice: Vec<Die>,
    cells: Vec<Vec<WinProbability>>,
}

impl ProbabilityTable {
    pub fn new(set: &DiceSet) -> Self {
        Self::from_dice(set.dice())
    }

    pub fn from_dice(dice: &[Die]) -> Self {
        let cells = dice
            .iter()
            .map(|row| dice.iter().map(|col| win_probability(row, col)).collect())
            .collect();
        Self {
            dice: dice.to_vec(),
            cells,
        }
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn get(&self, row: usize, col: usize) -> Option<WinProbability> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&Die, &[WinProbability])> {
        self.dice.iter().zip(self.cells.iter().map(Vec::as_slice))
    }
}
