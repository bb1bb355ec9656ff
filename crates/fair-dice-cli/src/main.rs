//! Fair Dice
//!
//! Console game of non-transitive dice against the computer. Every random
//! choice the computer makes is committed with an HMAC before the user
//! contributes, and revealed afterwards so the user can check it.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fair_dice_core::{
    DiceGame, DiceSet, Digest, GameConfig, GameOutcome, ProbabilityTable, Reveal, SecretKey,
    UnbiasedSampler,
};
use std::io;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod console;
mod render;

use console::ConsolePlayer;

const USAGE_EXAMPLE: &str = "fair-dice play 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7";

/// Provably-fair non-transitive dice
#[derive(Parser)]
#[command(name = "fair-dice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Minimum number of dice
    #[arg(long, global = true, env = "FAIR_DICE_MIN_DICE", default_value_t = GameConfig::DEFAULT_MIN_DICE)]
    min_dice: usize,

    /// Minimum number of faces per die
    #[arg(long, global = true, env = "FAIR_DICE_MIN_FACES", default_value_t = GameConfig::DEFAULT_MIN_FACES)]
    min_faces: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game against the computer
    Play {
        /// Dice as comma-separated faces, e.g. 2,2,4,4,9,9
        #[arg(required = true, allow_hyphen_values = true)]
        dice: Vec<String>,

        /// Also print commit and reveal messages as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print the win probability table and exit
    Table {
        #[arg(required = true, allow_hyphen_values = true)]
        dice: Vec<String>,
    },

    /// Check a revealed value and key against a published HMAC
    Verify {
        /// Revealed value
        #[arg(long)]
        value: u32,

        /// Revealed key (hex)
        #[arg(long)]
        key: String,

        /// HMAC published before the reveal (hex)
        #[arg(long)]
        hmac: String,
    },
}

impl Cli {
    fn config(&self) -> GameConfig {
        GameConfig::new(self.min_dice, self.min_faces)
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    Ok(())
}

fn parse_dice(dice: &[String], config: &GameConfig) -> Result<DiceSet> {
    DiceSet::parse(dice, config).with_context(|| format!("usage: {USAGE_EXAMPLE}"))
}

fn play(dice: &[String], config: &GameConfig, json: bool) -> Result<()> {
    let dice = parse_dice(dice, config)?;
    info!(dice = dice.len(), "starting game");

    let stdin = io::stdin();
    let mut player = ConsolePlayer::new(stdin.lock(), io::stdout(), &dice, json);
    let mut game = DiceGame::new(dice, UnbiasedSampler::os());

    let outcome = game.play(&mut player)?;
    if outcome == GameOutcome::Aborted {
        info!("player exited");
    }
    Ok(())
}

fn table(dice: &[String], config: &GameConfig) -> Result<()> {
    let dice = parse_dice(dice, config)?;
    print!("{}", render::probability_table(&ProbabilityTable::new(&dice)));
    Ok(())
}

fn verify(value: u32, key: &str, hmac: &str) -> Result<()> {
    let reveal = Reveal {
        value,
        key: key.parse::<SecretKey>()?,
    };
    let digest: Digest = hmac.parse()?;
    match reveal.verify(&digest) {
        Ok(()) => {
            println!("OK: HMAC-SHA256(key, \"{}\") matches", reveal.message());
            Ok(())
        }
        Err(e) => bail!("HMAC-SHA256(key, \"{}\") does not match: {}", reveal.message(), e),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let config = cli.config();

    match &cli.command {
        Commands::Play { dice, json } => play(dice, &config, *json),
        Commands::Table { dice } => table(dice, &config),
        Commands::Verify { value, key, hmac } => verify(*value, key, hmac),
    }
}
