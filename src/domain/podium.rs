//! PODIUM (five-item ranking) puzzle records.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One rankable item. `sort_value` keeps the number exactly as authored so
/// integer years stay integers in storage and in issue text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingItem {
    pub id: String,
    pub name: String,
    pub sort_value: Number,
    pub display_value: String,
}

/// A day's ranking puzzle, items in correct order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPuzzle {
    pub question: String,
    pub direction: String,
    pub category: String,
    pub emoji: String,
    pub fun_fact: String,
    pub items: Vec<RankingItem>,
}

impl RankingPuzzle {
    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }
}
