//! CLI module for puzzlecron - command-line interface and subcommands.
//!
//! One subcommand per game, each with generate / validate (and seed for
//! PODIUM).

pub mod commands;

pub use commands::Cli;
