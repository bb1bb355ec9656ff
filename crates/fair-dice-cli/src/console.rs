//! Console player: prompts on a line-based reader, prints to a writer.

use crate::render;
use fair_dice_core::game::{DieChoice, RoundPurpose};
use fair_dice_core::{
    CommitMessage, Contribution, ContributionSource, DiceSet, FairError, GameEvent, Player,
    ProbabilityTable, RevealMessage, RoundId, Side,
};
use std::io::{BufRead, Write};
use tracing::error;

/// What a line of user input asked for
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Exit,
    Help,
    Number(usize),
    Other(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.eq_ignore_ascii_case("x") {
            Input::Exit
        } else if line == "?" {
            Input::Help
        } else {
            line.parse()
                .map(Input::Number)
                .unwrap_or_else(|_| Input::Other(line.to_string()))
        }
    }
}

pub struct ConsolePlayer<I, O> {
    input: I,
    output: O,
    help: ProbabilityTable,
    json: bool,
    purpose: Option<RoundPurpose>,
    announced: Option<RoundId>,
}

impl<I: BufRead, O: Write> ConsolePlayer<I, O> {
    pub fn new(input: I, output: O, dice: &DiceSet, json: bool) -> Self {
        Self {
            input,
            output,
            help: ProbabilityTable::new(dice),
            json,
            purpose: None,
            announced: None,
        }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn say(&mut self, text: impl AsRef<str>) {
        if let Err(e) = writeln!(self.output, "{}", text.as_ref()) {
            error!("failed to write to console: {}", e);
        }
    }

    /// Prompt until the user gives a usable line; `None` on exit or EOF
    fn ask(&mut self) -> Option<usize> {
        loop {
            let prompt = write!(self.output, "Your selection: ").and_then(|_| self.output.flush());
            if let Err(e) = prompt {
                error!("failed to write to console: {}", e);
            }
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    error!("failed to read from console: {}", e);
                    return None;
                }
            }
            match Input::parse(&line) {
                Input::Exit => return None,
                Input::Help => {
                    let table = render::probability_table(&self.help);
                    self.say(table);
                }
                Input::Number(n) => return Some(n),
                Input::Other(text) => self.say(format!("\"{text}\" is not a valid selection.")),
            }
        }
    }

    fn menu(&mut self, options: impl IntoIterator<Item = (usize, String)>) {
        for (key, label) in options {
            self.say(format!("{key} - {label}"));
        }
        self.say("X - exit");
        self.say("? - help");
    }

    fn announce(&mut self, commit: &CommitMessage) {
        if self.announced == Some(commit.round_id) {
            return;
        }
        self.announced = Some(commit.round_id);

        let max = commit.range.saturating_sub(1);
        self.say(format!(
            "I selected a random value in the range 0..{max} (HMAC={}).",
            commit.digest
        ));
        if self.json {
            self.json_line(commit);
        }
        match self.purpose {
            Some(RoundPurpose::FirstMove) => self.say("Try to guess my selection."),
            _ => self.say(format!("Add your number modulo {}.", commit.range)),
        }
        self.menu((0..commit.range as usize).map(|i| (i, i.to_string())));
    }

    fn json_line<T: serde::Serialize>(&mut self, message: &T) {
        match serde_json::to_string(message) {
            Ok(json) => self.say(json),
            Err(e) => error!("failed to encode message: {}", e),
        }
    }
}

impl<I: BufRead, O: Write> ContributionSource for ConsolePlayer<I, O> {
    fn contribute(&mut self, commit: &CommitMessage) -> Contribution {
        self.announce(commit);
        loop {
            let Some(n) = self.ask() else {
                return Contribution::Abort;
            };
            match u32::try_from(n) {
                Ok(value) => return Contribution::Value(value),
                Err(_) => self.say(format!("{n} is too large.")),
            }
        }
    }

    fn rejected(&mut self, commit: &CommitMessage, _error: &FairError) {
        self.say(format!(
            "Please enter a number from 0 to {}.",
            commit.range.saturating_sub(1)
        ));
    }

    fn revealed(&mut self, commit: &CommitMessage, reveal: &RevealMessage) {
        self.say(format!(
            "My number is {} (KEY={}).",
            reveal.reveal.value, reveal.reveal.key
        ));
        if self.purpose != Some(RoundPurpose::FirstMove) {
            self.say(format!(
                "The fair number generation result is {} + {} = {} (mod {}).",
                reveal.reveal.value, reveal.contribution, reveal.final_value, commit.range
            ));
        }
        if self.json {
            self.json_line(reveal);
        }
    }
}

impl<I: BufRead, O: Write> Player for ConsolePlayer<I, O> {
    fn choose_die(&mut self, dice: &DiceSet, available: &[usize]) -> DieChoice {
        self.say("Choose your dice:");
        let options: Vec<(usize, String)> = available
            .iter()
            .filter_map(|&i| dice.get(i).map(|d| (i, d.to_string())))
            .collect();
        self.menu(options);
        match self.ask() {
            Some(index) => DieChoice::Index(index),
            None => DieChoice::Abort,
        }
    }

    fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { purpose, .. } => {
                if *purpose == RoundPurpose::FirstMove {
                    self.say("Let's determine who makes the first move.");
                }
                self.purpose = Some(*purpose);
            }
            GameEvent::FirstMove { first, .. } => match first {
                Side::User => self.say("You guessed right, you make the first move."),
                Side::Computer => self.say("I make the first move."),
            },
            GameEvent::DieChosen { side, die, .. } => match side {
                Side::User => self.say(format!("You choose the {die} dice.")),
                Side::Computer => self.say(format!("I choose the {die} dice.")),
            },
            GameEvent::DieRejected { index } => {
                self.say(format!("Dice {index} is not available."))
            }
            GameEvent::Rolled { side, face, .. } => match side {
                Side::User => self.say(format!("Your roll result is {face}.")),
                Side::Computer => self.say(format!("My roll result is {face}.")),
            },
            GameEvent::Finished {
                user,
                computer,
                outcome,
            } => {
                let table = render::result(*user, *computer, *outcome);
                self.say(table);
            }
            GameEvent::Aborted => self.say("Exiting..."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fair_dice_core::{DiceGame, GameConfig, GameOutcome};
    use std::io::Cursor;

    const DICE: [&str; 3] = ["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"];

    fn play(script: &str) -> (GameOutcome, String) {
        let mut game = DiceGame::from_args(&DICE, &GameConfig::default()).unwrap();
        let mut player =
            ConsolePlayer::new(Cursor::new(script.to_string()), Vec::new(), game.dice(), false);
        let outcome = game.play(&mut player).unwrap();
        let output = String::from_utf8(player.into_output()).unwrap();
        (outcome, output)
    }

    #[test]
    fn test_input_parse() {
        assert_eq!(Input::parse("X\n"), Input::Exit);
        assert_eq!(Input::parse(" x "), Input::Exit);
        assert_eq!(Input::parse("?"), Input::Help);
        assert_eq!(Input::parse("3\n"), Input::Number(3));
        assert_eq!(Input::parse("-1"), Input::Other("-1".to_string()));
    }

    #[test]
    fn test_exit_at_first_prompt() {
        let (outcome, output) = play("x\n");
        assert_eq!(outcome, GameOutcome::Aborted);
        assert!(output.contains("HMAC="));
        assert!(output.contains("Exiting..."));
        assert!(!output.contains("KEY="));
    }

    #[test]
    fn test_eof_aborts() {
        let (outcome, _) = play("");
        assert_eq!(outcome, GameOutcome::Aborted);
    }

    #[test]
    fn test_help_and_invalid_input_reprompt() {
        let (outcome, output) = play("?\nfoo\n7\nx\n");
        assert_eq!(outcome, GameOutcome::Aborted);
        assert!(output.contains("Probability of the win for the user:"));
        assert!(output.contains("\"foo\" is not a valid selection."));
        assert!(output.contains("Please enter a number from 0 to 1."));
        // The digest is announced once per round, not per prompt.
        assert_eq!(output.matches("HMAC=").count(), 1);
    }

    #[test]
    fn test_complete_game() {
        // Die choices 0 then 1 cover whichever die the computer takes first.
        let (outcome, output) = play("0\n0\n1\n0\n0\n");
        assert_ne!(outcome, GameOutcome::Aborted);
        assert_eq!(output.matches("HMAC=").count(), 3);
        assert_eq!(output.matches("KEY=").count(), 3);
        assert!(output.contains("Your roll result is"));
        assert!(output.contains("My roll result is"));
        assert!(output.contains("│ Result"));
    }

    #[test]
    fn test_json_messages() {
        let mut game = DiceGame::from_args(&DICE, &GameConfig::default()).unwrap();
        let mut player = ConsolePlayer::new(Cursor::new("1\nx\n"), Vec::new(), game.dice(), true);
        game.play(&mut player).unwrap();
        let output = String::from_utf8(player.into_output()).unwrap();

        let commit: CommitMessage = output
            .lines()
            .find(|l| l.starts_with("{\"round_id\"") && l.contains("\"digest\""))
            .map(|l| serde_json::from_str(l).unwrap())
            .unwrap();
        let reveal: RevealMessage = output
            .lines()
            .find(|l| l.contains("\"final_value\""))
            .map(|l| serde_json::from_str(l).unwrap())
            .unwrap();
        assert!(reveal.verify(&commit).is_ok());
    }
}
