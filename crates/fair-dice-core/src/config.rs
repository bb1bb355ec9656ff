//! Game configuration.

use crate::dice::Die;
use serde::{Deserialize, Serialize};

/// Limits the game layer enforces on the dice it is given.
///
/// Values below the floors are raised to them: a game needs two dice to
/// choose between and every die has at least [`Die::MIN_FACES`] faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum number of dice on the table
    pub min_dice: usize,
    /// Minimum number of faces per die
    pub min_faces: usize,
}

impl GameConfig {
    pub const DEFAULT_MIN_DICE: usize = 3;
    pub const DEFAULT_MIN_FACES: usize = 6;
    /// Lowest `min_dice` a game can run with
    pub const FLOOR_DICE: usize = 2;

    pub fn new(min_dice: usize, min_faces: usize) -> Self {
        Self {
            min_dice: min_dice.max(Self::FLOOR_DICE),
            min_faces: min_faces.max(Die::MIN_FACES),
        }
    }

    /// `min_dice` with the floor applied, for configs built field by field
    pub fn required_dice(&self) -> usize {
        self.min_dice.max(Self::FLOOR_DICE)
    }

    pub fn required_faces(&self) -> usize {
        self.min_faces.max(Die::MIN_FACES)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_dice: Self::DEFAULT_MIN_DICE,
            min_faces: Self::DEFAULT_MIN_FACES,
        }
    }
}
