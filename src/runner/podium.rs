//! PODIUM side of the generation loop.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;

use super::generation::PuzzleJob;
use crate::domain::RankingPuzzle;
use crate::error::Result;
use crate::prompt::podium::{RECENT_CATEGORY_FETCH, SYSTEM_PROMPT, build_prompt};
use crate::storage::PodiumStore;
use crate::validation::podium::parse_puzzle;

/// Context fixed for the whole run
#[derive(Debug, Clone, PartialEq)]
pub struct PodiumPlan {
    pub puzzle_number: i64,
    /// Newest first
    pub recent_categories: Vec<String>,
}

/// Generates one PODIUM puzzle into a [`PodiumStore`]
pub struct PodiumJob<S: PodiumStore> {
    store: Arc<S>,
}

impl<S: PodiumStore> PodiumJob<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: PodiumStore> PuzzleJob for PodiumJob<S> {
    type Puzzle = RankingPuzzle;
    type Plan = PodiumPlan;

    fn game(&self) -> &'static str {
        "PODIUM"
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    fn exists(&self, date: NaiveDate) -> Result<bool> {
        self.store.exists(date)
    }

    /// Every generated puzzle, replacements included, gets max + 1.
    fn plan(&self, date: NaiveDate) -> Result<PodiumPlan> {
        let puzzle_number = self.store.next_puzzle_number()?;

        let recent_categories = self
            .store
            .recent_categories(RECENT_CATEGORY_FETCH)
            .unwrap_or_else(|e| {
                warn!("Could not fetch recent categories: {}", e);
                Vec::new()
            });

        info!("Puzzle #{} for {}", puzzle_number, date);
        info!(
            "Avoiding recent categories: {:?}",
            recent_categories.iter().take(10).collect::<Vec<_>>()
        );

        Ok(PodiumPlan {
            puzzle_number,
            recent_categories,
        })
    }

    fn prompt(&self, date: NaiveDate, plan: &PodiumPlan) -> String {
        build_prompt(date, plan.puzzle_number, &plan.recent_categories)
    }

    fn accept(&self, candidate: Value) -> Result<RankingPuzzle> {
        parse_puzzle(candidate)
    }

    fn persist(&self, date: NaiveDate, plan: &PodiumPlan, puzzle: &RankingPuzzle, replace: bool) -> Result<()> {
        if replace {
            self.store.replace(date, plan.puzzle_number, puzzle)?;
            info!("Replaced puzzle #{} for {} (--force)", plan.puzzle_number, date);
        } else {
            self.store.insert(date, plan.puzzle_number, puzzle)?;
            info!("Inserted puzzle #{} for {}", plan.puzzle_number, date);
        }
        Ok(())
    }

    fn describe(&self, puzzle: &RankingPuzzle) -> String {
        format!(
            "category={:?}, direction={:?}, items={:?}",
            puzzle.category,
            puzzle.direction,
            puzzle.item_names()
        )
    }
}
