//! Static rule tables for both games.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// MISCAST difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers in the order they appear in a day file
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Thresholds for this tier
    pub fn rules(&self) -> DifficultyRuleset {
        match self {
            Difficulty::Easy => DifficultyRuleset::exact(3, 25, 80),
            Difficulty::Medium => DifficultyRuleset::exact(5, 40, 150),
            Difficulty::Hard => DifficultyRuleset::exact(7, 100, 300),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(PuzzleError::InvalidInput(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// Word-count and error-count bounds for one tier.
///
/// `min_errors` and `max_errors` are always equal today (exactly N errors).
/// They are kept as a pair so the issue wording matches each bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyRuleset {
    pub min_errors: usize,
    pub max_errors: usize,
    pub min_words: usize,
    pub max_words: usize,
}

impl DifficultyRuleset {
    const fn exact(errors: usize, min_words: usize, max_words: usize) -> Self {
        Self {
            min_errors: errors,
            max_errors: errors,
            min_words,
            max_words,
        }
    }
}

/// Number of items in every PODIUM puzzle
pub const RANKING_ITEM_COUNT: usize = 5;

/// Positional ids for PODIUM items
pub const RANKING_ITEM_IDS: [&str; RANKING_ITEM_COUNT] = ["a", "b", "c", "d", "e"];

/// Top-level fields a PODIUM record must carry
pub const RANKING_REQUIRED_FIELDS: [&str; 6] = ["question", "direction", "category", "emoji", "fun_fact", "items"];

/// Fields every PODIUM item must carry
pub const RANKING_ITEM_FIELDS: [&str; 4] = ["id", "name", "sort_value", "display_value"];

/// Text fields that must be non-empty after trimming
pub const RANKING_TEXT_FIELDS: [&str; 5] = ["question", "direction", "category", "emoji", "fun_fact"];

/// Heuristic floor against degenerate generator output, not a domain rule
pub const MIN_QUESTION_CHARS: usize = 20;

/// Heuristic floor against degenerate generator output, not a domain rule
pub const MIN_FUN_FACT_CHARS: usize = 50;
