//! The player collaborator.

use super::types::{DieChoice, GameEvent};
use crate::dice::DiceSet;
use crate::protocol::ContributionSource;

/// The human side of a game.
///
/// Contributions come through [`ContributionSource`]; everything else the
/// game needs from the user is asked here. All user I/O lives behind this
/// trait so the game itself runs without a terminal.
pub trait Player: ContributionSource {
    /// Pick one of `available` (indices into `dice`)
    fn choose_die(&mut self, dice: &DiceSet, available: &[usize]) -> DieChoice;

    /// Notification of game progress
    fn observe(&mut self, event: &GameEvent);
}
