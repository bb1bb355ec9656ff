//! One game of non-transitive dice between the computer and a player.

use super::traits::Player;
use super::types::{DieChoice, GameEvent, GameOutcome, RoundPurpose, Side};
use crate::config::GameConfig;
use crate::crypto::UnbiasedSampler;
use crate::dice::{DiceSet, Die};
use crate::error::{FairError, Result};
use crate::protocol::{run_round, RoundOutcome, RoundResult};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

/// Runs the first-move decision, die selection, and both rolls, each roll
/// through its own fair round.
pub struct DiceGame<R = OsRng> {
    dice: DiceSet,
    sampler: UnbiasedSampler<R>,
}

impl DiceGame<OsRng> {
    /// Parse `args` and set up a game backed by the OS random source
    pub fn from_args<S: AsRef<str>>(args: &[S], config: &GameConfig) -> Result<Self> {
        Ok(Self::new(DiceSet::parse(args, config)?, UnbiasedSampler::os()))
    }
}

impl<R: RngCore + CryptoRng> DiceGame<R> {
    pub fn new(dice: DiceSet, sampler: UnbiasedSampler<R>) -> Self {
        Self { dice, sampler }
    }

    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    /// Play one game to completion or until the player aborts.
    ///
    /// Only protocol violations and entropy failures are returned as errors;
    /// an abort is [`GameOutcome::Aborted`].
    pub fn play<P: Player + ?Sized>(&mut self, player: &mut P) -> Result<GameOutcome> {
        let Some(first) = self.decide_first_move(player)? else {
            return Ok(abort(player));
        };

        let Some((user_die, computer_die)) = self.select_dice(player, first)? else {
            return Ok(abort(player));
        };

        let Some(computer) = self.roll(player, Side::Computer, &computer_die)? else {
            return Ok(abort(player));
        };
        let Some(user) = self.roll(player, Side::User, &user_die)? else {
            return Ok(abort(player));
        };

        let outcome = GameOutcome::from_faces(user, computer);
        info!(user, computer, %outcome, "game finished");
        player.observe(&GameEvent::Finished {
            user,
            computer,
            outcome,
        });
        Ok(outcome)
    }

    fn decide_first_move<P: Player + ?Sized>(&mut self, player: &mut P) -> Result<Option<Side>> {
        let Some(result) = self.fair_round(player, RoundPurpose::FirstMove, 2)? else {
            return Ok(None);
        };
        // (secret + guess) mod 2 is zero exactly when the guess was right.
        let first = if result.final_value == 0 {
            Side::User
        } else {
            Side::Computer
        };
        debug!(?first, "first move decided");
        player.observe(&GameEvent::FirstMove { result, first });
        Ok(Some(first))
    }

    /// Returns `(user_die, computer_die)`
    fn select_dice<P: Player + ?Sized>(
        &mut self,
        player: &mut P,
        first: Side,
    ) -> Result<Option<(Die, Die)>> {
        let all: Vec<usize> = (0..self.dice.len()).collect();
        let (user, computer) = match first {
            Side::Computer => {
                let computer = self.computer_pick(&all)?;
                self.announce(player, Side::Computer, computer);
                let rest: Vec<usize> = all.into_iter().filter(|&i| i != computer).collect();
                let Some(user) = self.user_pick(player, &rest) else {
                    return Ok(None);
                };
                (user, computer)
            }
            Side::User => {
                let Some(user) = self.user_pick(player, &all) else {
                    return Ok(None);
                };
                let rest: Vec<usize> = all.into_iter().filter(|&i| i != user).collect();
                let computer = self.computer_pick(&rest)?;
                self.announce(player, Side::Computer, computer);
                (user, computer)
            }
        };
        Ok(Some((self.die(user)?, self.die(computer)?)))
    }

    fn computer_pick(&mut self, available: &[usize]) -> Result<usize> {
        let count = u32::try_from(available.len())
            .map_err(|_| FairError::invalid("too many dice to choose from"))?;
        let slot = self.sampler.sample(count)? as usize;
        Ok(available[slot])
    }

    fn user_pick<P: Player + ?Sized>(&self, player: &mut P, available: &[usize]) -> Option<usize> {
        loop {
            match player.choose_die(&self.dice, available) {
                DieChoice::Abort => return None,
                DieChoice::Index(index) if available.contains(&index) => {
                    self.announce(player, Side::User, index);
                    return Some(index);
                }
                DieChoice::Index(index) => {
                    warn!(index, "die choice rejected");
                    player.observe(&GameEvent::DieRejected { index });
                }
            }
        }
    }

    fn announce<P: Player + ?Sized>(&self, player: &mut P, side: Side, index: usize) {
        if let Some(die) = self.dice.get(index) {
            debug!(%side, index, %die, "die chosen");
            player.observe(&GameEvent::DieChosen {
                side,
                index,
                die: die.clone(),
            });
        }
    }

    fn roll<P: Player + ?Sized>(
        &mut self,
        player: &mut P,
        side: Side,
        die: &Die,
    ) -> Result<Option<i64>> {
        let range = u32::try_from(die.face_count())
            .map_err(|_| FairError::invalid(format!("die {die} has too many faces")))?;
        let Some(result) = self.fair_round(player, RoundPurpose::Roll(side), range)? else {
            return Ok(None);
        };
        let face = die
            .face(result.final_value as usize)
            .ok_or_else(|| FairError::invalid(format!("no face {} on {die}", result.final_value)))?;
        player.observe(&GameEvent::Rolled { side, result, face });
        Ok(Some(face))
    }

    fn fair_round<P: Player + ?Sized>(
        &mut self,
        player: &mut P,
        purpose: RoundPurpose,
        range: u32,
    ) -> Result<Option<RoundResult>> {
        player.observe(&GameEvent::RoundStarted { purpose, range });
        Ok(match run_round(range, &mut self.sampler, player)? {
            RoundOutcome::Completed(result) => Some(result),
            RoundOutcome::Aborted(_) => None,
        })
    }

    fn die(&self, index: usize) -> Result<Die> {
        self.dice
            .get(index)
            .cloned()
            .ok_or_else(|| FairError::invalid(format!("no die at index {index}")))
    }
}

fn abort<P: Player + ?Sized>(player: &mut P) -> GameOutcome {
    info!("game aborted by player");
    player.observe(&GameEvent::Aborted);
    GameOutcome::Aborted
}
