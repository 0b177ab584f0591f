//! MISCAST (spot-the-error) puzzle records.

use serde::{Deserialize, Serialize};

use crate::validation::Difficulty;

/// Accepted correction(s) for an error word.
///
/// Hand-authored files list every acceptable correction; generated ones
/// may carry a single string. Both shapes are read, but the game client
/// only understands the list, so vault files are written with `Many`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Correction {
    One(String),
    Many(Vec<String>),
}

impl Correction {
    pub fn into_many(self) -> Self {
        match self {
            Correction::One(s) => Correction::Many(vec![s]),
            many => many,
        }
    }
}

/// One embedded error: the wrong word as it appears and its correction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSpotEntry {
    pub wrong: String,
    pub right: Correction,
}

/// One tier's paragraph with its embedded errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSpotPuzzle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub theme: String,
    pub text: String,
    pub errors: Vec<ErrorSpotEntry>,
}

/// A full vault day: one puzzle per tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscastDay {
    pub easy: ErrorSpotPuzzle,
    pub medium: ErrorSpotPuzzle,
    pub hard: ErrorSpotPuzzle,
}

impl MiscastDay {
    pub fn tier(&self, difficulty: Difficulty) -> &ErrorSpotPuzzle {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// The same day with every correction in list form
    pub fn with_listed_corrections(mut self) -> Self {
        for puzzle in [&mut self.easy, &mut self.medium, &mut self.hard] {
            for entry in &mut puzzle.errors {
                entry.right = std::mem::replace(&mut entry.right, Correction::Many(Vec::new())).into_many();
            }
        }
        self
    }
}
