//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - podium: generate / validate / seed ranking puzzles
//! - miscast: generate / validate spot-the-error days

use chrono::{Days, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// puzzlecron - daily puzzle generation and validation for PODIUM and MISCAST
#[derive(Parser, Debug)]
#[command(name = "puzzlecron")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the PODIUM database path
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Override the MISCAST vault directory
    #[arg(long, global = true)]
    pub vault_dir: Option<PathBuf>,

    /// Game to operate on
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Game subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Five-item ranking puzzles (SQLite)
    Podium {
        #[command(subcommand)]
        command: PodiumCommands,
    },

    /// Spot-the-error puzzles (vault files)
    Miscast {
        #[command(subcommand)]
        command: MiscastCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PodiumCommands {
    /// Generate the puzzle for a date (exit 0 created, 1 failed, 2 already exists)
    Generate(GenerateArgs),

    /// Re-validate stored puzzles (exit 0 valid, 1 missing or invalid)
    Validate(ValidateArgs),

    /// Seed hand-authored puzzles on consecutive dates, skipping taken dates
    Seed {
        /// JSON array of puzzles
        #[arg(short, long)]
        file: PathBuf,

        /// First date to seed (default: today)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Print what would be inserted without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum MiscastCommands {
    /// Generate the vault day for a date (exit 0 created, 1 failed, 2 already exists)
    Generate(GenerateArgs),

    /// Validate vault days (exit 0 valid, 1 missing or invalid)
    Validate {
        #[command(flatten)]
        args: ValidateArgs,

        /// Validate every file in the vault
        #[arg(long, conflicts_with_all = ["date", "days"])]
        all: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Target date YYYY-MM-DD (default: tomorrow)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Generate and validate but don't save
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite an existing puzzle for this date
    #[arg(long)]
    pub force: bool,

    /// Override the model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Skip the alert on failure
    #[arg(long)]
    pub no_alert: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// First date YYYY-MM-DD (default: tomorrow)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Number of consecutive days to check
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: u32,

    /// Machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Skip the alert on failure
    #[arg(long)]
    pub no_alert: bool,
}

/// Tomorrow in local time, the default target for every command
pub fn tomorrow() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}
