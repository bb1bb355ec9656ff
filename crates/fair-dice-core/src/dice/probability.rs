//! Pairwise win probabilities between dice.

use super::die::Die;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact outcome counts for "a random face of A beats a random face of B"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinProbability {
    /// Ordered pairs `(x, y)` with `x > y`
    pub wins: u64,
    /// Ordered pairs with `x == y`
    pub ties: u64,
    /// `|A| * |B|`
    pub total: u64,
}

impl WinProbability {
    pub fn losses(&self) -> u64 {
        self.total - self.wins - self.ties
    }

    pub fn as_f64(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.wins as f64 / self.total as f64
        }
    }

    pub fn tie_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.ties as f64 / self.total as f64
        }
    }

    /// The same pairs seen from the other die
    pub fn reversed(&self) -> Self {
        Self {
            wins: self.losses(),
            ties: self.ties,
            total: self.total,
        }
    }
}

impl fmt::Display for WinProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.as_f64())
    }
}

/// Probability that a uniformly random face of `a` beats one of `b`.
/// Ties count as neither win nor loss.
pub fn win_probability(a: &Die, b: &Die) -> WinProbability {
    let mut wins = 0u64;
    let mut ties = 0u64;
    for x in a.faces() {
        for y in b.faces() {
            if x > y {
                wins += 1;
            } else if x == y {
                ties += 1;
            }
        }
    }
    WinProbability {
        wins,
        ties,
        total: (a.face_count() as u64) * (b.face_count() as u64),
    }
}
