//! Integration tests for the full game flow.
//!
//! These tests simulate complete rounds and games from start to finish,
//! checking each step the way an independent verifier would.

use fair_dice_core::{
    crypto::{Digest, SecretKey, UnbiasedSampler},
    dice::{win_probability, DiceSet, ProbabilityTable},
    game::{DiceGame, GameEvent, GameOutcome, ScriptedPlayer, Side},
    protocol::{
        run_round, CommitMessage, Contribution, FairValueExchange, RevealMessage,
        ScriptedContributions,
    },
    FairError, GameConfig, Violation,
};

const DICE: [&str; 3] = ["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"];

/// Walk a round by hand, shipping only JSON between the two parties
#[test]
fn test_manual_round_over_the_wire() {
    let mut sampler = UnbiasedSampler::os();

    // Phase 1: computer commits and publishes the digest
    let mut round = FairValueExchange::new(6).unwrap();
    let digest = round.commit(&mut sampler).unwrap();
    let commit_json = serde_json::to_string(&CommitMessage {
        round_id: round.id(),
        range: 6,
        digest,
    })
    .unwrap();

    // Phase 2: user reads the digest and contributes
    let seen: CommitMessage = serde_json::from_str(&commit_json).unwrap();
    assert_eq!(seen.range, 6);
    round.accept_contribution(3).unwrap();

    // Phase 3: computer reveals
    let result = round.reveal().unwrap();
    let reveal_json = serde_json::to_string(&RevealMessage::from(&result)).unwrap();

    // Phase 4: user verifies against what they saw before contributing
    let reveal: RevealMessage = serde_json::from_str(&reveal_json).unwrap();
    assert!(reveal.verify(&seen).is_ok());

    // The key and value alone reproduce the digest
    let key: SecretKey = reveal.reveal.key.to_string().parse().unwrap();
    let recomputed = Digest::compute(&key, reveal.reveal.value).unwrap();
    assert_eq!(recomputed, seen.digest);
    assert_eq!(reveal.final_value, (reveal.reveal.value + 3) % 6);
}

/// Out-of-order calls never yield a partial result
#[test]
fn test_round_ordering_enforced() {
    let mut sampler = UnbiasedSampler::os();
    let mut round = FairValueExchange::new(6).unwrap();

    assert!(matches!(
        round.reveal(),
        Err(FairError::ProtocolViolation(Violation::RevealBeforeContribution))
    ));
    assert!(matches!(
        round.accept_contribution(0),
        Err(FairError::ProtocolViolation(Violation::ContributionBeforeCommit))
    ));

    round.commit(&mut sampler).unwrap();
    assert!(matches!(
        round.reveal(),
        Err(FairError::ProtocolViolation(Violation::RevealBeforeContribution))
    ));

    round.accept_contribution(0).unwrap();
    assert!(matches!(
        round.commit(&mut sampler),
        Err(FairError::ProtocolViolation(Violation::CommitmentReused))
    ));
    assert!(round.reveal().is_ok());
}

/// Every contribution maps to a distinct final value
#[test]
fn test_combination_is_fair_for_every_contribution() {
    let mut sampler = UnbiasedSampler::os();
    let range = 6;

    let mut finals = Vec::new();
    for contribution in 0..range {
        let mut source = ScriptedContributions::values([contribution]);
        let result = run_round(range, &mut sampler, &mut source)
            .unwrap()
            .completed()
            .unwrap();
        assert!(result.verify().is_ok());
        // Each round has its own secret, so undo it to compare contributions.
        finals.push((result.final_value + range - result.secret_value()) % range);
    }
    assert_eq!(finals, (0..range).collect::<Vec<_>>());
}

/// A full game with real randomness is internally consistent
#[test]
fn test_full_game_is_verifiable() {
    let mut game = DiceGame::from_args(&DICE, &GameConfig::default()).unwrap();
    // Enough choices to cover whichever die the computer takes.
    let mut player = ScriptedPlayer::new([0, 2, 5], [0, 1]);

    let outcome = game.play(&mut player).unwrap();
    assert_ne!(outcome, GameOutcome::Aborted);

    let contributions = player.contributions();
    assert_eq!(contributions.commits().len(), 3);
    assert_eq!(contributions.reveals().len(), 3);
    for (commit, reveal) in contributions.commits().iter().zip(contributions.reveals()) {
        assert!(reveal.verify(commit).is_ok());
    }

    let (user_die, computer_die) = chosen_dice(player.events());
    assert_ne!(user_die, computer_die);

    match player.events().last() {
        Some(GameEvent::Finished {
            user,
            computer,
            outcome: finished,
        }) => {
            assert_eq!(*finished, outcome);
            assert_eq!(GameOutcome::from_faces(*user, *computer), outcome);
            assert!(game.dice().get(user_die).unwrap().faces().contains(user));
            assert!(game
                .dice()
                .get(computer_die)
                .unwrap()
                .faces()
                .contains(computer));
        }
        other => panic!("expected Finished, got {other:?}"),
    }
}

/// An abort at the first prompt ends the game with nothing revealed
#[test]
fn test_abort_before_first_move() {
    let mut game = DiceGame::from_args(&DICE, &GameConfig::default()).unwrap();
    let mut player = ScriptedPlayer::new([], []);

    assert_eq!(game.play(&mut player).unwrap(), GameOutcome::Aborted);
    assert_eq!(player.contributions().commits().len(), 1);
    assert!(player.contributions().reveals().is_empty());
}

#[test]
fn test_contribution_abort_variant() {
    let mut source = ScriptedContributions::new([Contribution::Abort, Contribution::Value(1)]);
    let outcome = run_round(2, &mut UnbiasedSampler::os(), &mut source).unwrap();
    assert!(outcome.completed().is_none());
}

#[test]
fn test_probability_table_for_non_transitive_set() {
    let set = DiceSet::parse(&DICE, &GameConfig::default()).unwrap();
    let table = ProbabilityTable::new(&set);

    assert_eq!(table.get(0, 1).unwrap().wins, 20);
    assert_eq!(table.get(1, 2).unwrap().wins, 20);
    assert_eq!(table.get(2, 0).unwrap().wins, 20);
    assert_eq!(
        table.get(0, 0),
        Some(win_probability(set.get(0).unwrap(), set.get(0).unwrap()))
    );
}

fn chosen_dice(events: &[GameEvent]) -> (usize, usize) {
    let mut user = None;
    let mut computer = None;
    for event in events {
        if let GameEvent::DieChosen { side, index, .. } = event {
            match side {
                Side::User => user = Some(*index),
                Side::Computer => computer = Some(*index),
            }
        }
    }
    (user.unwrap(), computer.unwrap())
}
