//! Dice and dice sets.

use crate::config::GameConfig;
use crate::error::{FairError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An immutable ordered list of face values
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Die(Vec<i64>);

impl Die {
    /// Fewest faces a die can have
    pub const MIN_FACES: usize = 3;

    pub fn new(faces: Vec<i64>) -> Result<Self> {
        if faces.len() < Self::MIN_FACES {
            return Err(FairError::invalid(format!(
                "a die needs at least {} faces, found {}",
                Self::MIN_FACES,
                faces.len()
            )));
        }
        Ok(Self(faces))
    }

    pub fn faces(&self) -> &[i64] {
        &self.0
    }

    pub fn face_count(&self) -> usize {
        self.0.len()
    }

    /// Face at `index`, as selected by a round's final value
    pub fn face(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }
}

impl TryFrom<Vec<i64>> for Die {
    type Error = FairError;

    fn try_from(faces: Vec<i64>) -> Result<Self> {
        Self::new(faces)
    }
}

impl From<Die> for Vec<i64> {
    fn from(die: Die) -> Self {
        die.0
    }
}

impl FromStr for Die {
    type Err = FairError;

    /// Parse `"2,2,4,4,9,9"`
    fn from_str(s: &str) -> Result<Self> {
        let faces = s
            .split(',')
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<i64>()
                    .map_err(|_| FairError::invalid(format!("\"{token}\" is not an integer face")))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(faces)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, face) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{face}")?;
        }
        write!(f, "]")
    }
}

/// The dice available for one game, all with the same face count
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiceSet(Vec<Die>);

impl DiceSet {
    /// Validate already-built dice against `config`
    pub fn new(dice: Vec<Die>, config: &GameConfig) -> Result<Self> {
        let min_dice = config.required_dice();
        let min_faces = config.required_faces();
        if dice.len() < min_dice {
            return Err(FairError::invalid(format!(
                "at least {} dice are required, got {}",
                min_dice,
                dice.len()
            )));
        }
        let expected = dice[0].face_count();
        for (i, die) in dice.iter().enumerate() {
            if die.face_count() < min_faces {
                return Err(FairError::invalid(format!(
                    "die #{} must have at least {} faces, found {}",
                    i + 1,
                    min_faces,
                    die.face_count()
                )));
            }
            if die.face_count() != expected {
                return Err(FairError::invalid(format!(
                    "die #{} has {} faces but die #1 has {}",
                    i + 1,
                    die.face_count(),
                    expected
                )));
            }
        }
        Ok(Self(dice))
    }

    /// Parse one die per argument
    pub fn parse<S: AsRef<str>>(args: &[S], config: &GameConfig) -> Result<Self> {
        let dice = args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                arg.as_ref().parse::<Die>().map_err(|e| match e {
                    FairError::InvalidArgument(msg) => {
                        FairError::invalid(format!("die #{}: {msg}", i + 1))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(dice, config)
    }

    pub fn dice(&self) -> &[Die] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Die> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
