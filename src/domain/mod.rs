//! Domain types for puzzlecron
//!
//! - miscast: spot-the-error puzzles, one per tier, grouped into a vault day
//! - podium: five-item ranking puzzles
//! - outcome: result of a generation run

pub mod miscast;
pub mod outcome;
pub mod podium;

pub use miscast::{Correction, ErrorSpotEntry, ErrorSpotPuzzle, MiscastDay};
pub use outcome::GenerationOutcome;
pub use podium::{RankingItem, RankingPuzzle};
