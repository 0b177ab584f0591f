//! puzzlecron - daily puzzle generation and validation
//!
//! Produces one puzzle per day for two games from an unreliable AI
//! generator, rejecting anything that breaks the game rules:
//! - PODIUM: five-item ranking puzzles stored in SQLite
//! - MISCAST: three-tier spot-the-error puzzles stored as dated vault files
//!
//! Every candidate goes through the same rule engine on the way in
//! ([`runner`]) and again on the way back out ([`check`]).

pub mod alert;
pub mod app;
pub mod check;
pub mod domain;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod runner;
pub mod seed;
pub mod storage;
pub mod validation;

pub use error::{PuzzleError, Result};
