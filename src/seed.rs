//! Launch-buffer seeding for PODIUM.
//!
//! Hand-authored puzzles go in on consecutive dates. Dates that already
//! have a puzzle are skipped, so re-running a seed is harmless.

use std::path::Path;

use chrono::{Days, NaiveDate};
use log::info;
use serde::Serialize;
use serde_json::Value;

use crate::domain::RankingPuzzle;
use crate::error::{PuzzleError, Result};
use crate::storage::PodiumStore;
use crate::validation::podium::parse_puzzle;

/// One authored puzzle, optionally pinned to a puzzle number
#[derive(Debug, Clone, PartialEq)]
pub struct SeedEntry {
    pub puzzle_number: Option<i64>,
    pub puzzle: RankingPuzzle,
}

/// What happened to one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedAction {
    Inserted,
    WouldInsert,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedResult {
    pub date: NaiveDate,
    pub puzzle_number: Option<i64>,
    pub question: String,
    pub action: SeedAction,
}

impl SeedResult {
    pub fn counts(results: &[SeedResult]) -> (usize, usize) {
        let skipped = results.iter().filter(|r| r.action == SeedAction::Skipped).count();
        (results.len() - skipped, skipped)
    }
}

/// Read and gate a seed file: a JSON array of puzzle objects.
///
/// Every entry must pass the fail-fast rules; the first bad entry aborts the
/// load so nothing is half-seeded.
pub fn load_seed_file(path: &Path) -> Result<Vec<SeedEntry>> {
    let raw = std::fs::read_to_string(path)?;
    parse_seed(&raw)
}

pub fn parse_seed(raw: &str) -> Result<Vec<SeedEntry>> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(entries) = value else {
        return Err(PuzzleError::InvalidInput("Seed file must hold a JSON array".to_string()));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, mut entry)| {
            let puzzle_number = match entry.as_object_mut().and_then(|o| o.remove("puzzle_number")) {
                None | Some(Value::Null) => None,
                Some(n) => Some(n.as_i64().ok_or_else(|| {
                    PuzzleError::InvalidInput(format!("Seed entry {}: puzzle_number must be an integer", i))
                })?),
            };
            let puzzle = parse_puzzle(entry).map_err(|e| match e {
                PuzzleError::Validation(issue) => PuzzleError::Validation(format!("Seed entry {}: {}", i, issue)),
                other => other,
            })?;
            Ok(SeedEntry { puzzle_number, puzzle })
        })
        .collect()
}

/// Seed `entries` on consecutive dates from `start`.
///
/// Entries without a pinned number get max + 1 at insert time.
pub fn seed<S: PodiumStore>(store: &S, entries: &[SeedEntry], start: NaiveDate, dry_run: bool) -> Result<Vec<SeedResult>> {
    let mut results = Vec::with_capacity(entries.len());
    let mut next_number = store.next_puzzle_number()?;

    for (offset, entry) in entries.iter().enumerate() {
        let date = start
            .checked_add_days(Days::new(offset as u64))
            .ok_or_else(|| PuzzleError::InvalidInput(format!("Date overflow seeding from {}", start)))?;
        let question = entry.puzzle.question.clone();

        if store.exists(date)? {
            info!("Puzzle for {} already exists, skipping", date);
            results.push(SeedResult {
                date,
                puzzle_number: entry.puzzle_number,
                question,
                action: SeedAction::Skipped,
            });
            continue;
        }

        let puzzle_number = entry.puzzle_number.unwrap_or(next_number);
        next_number = next_number.max(puzzle_number + 1);

        let action = if dry_run {
            info!("[DRY RUN] Would insert puzzle #{} for {}", puzzle_number, date);
            SeedAction::WouldInsert
        } else {
            store.insert(date, puzzle_number, &entry.puzzle)?;
            info!("Inserted puzzle #{} for {}", puzzle_number, date);
            SeedAction::Inserted
        };

        results.push(SeedResult {
            date,
            puzzle_number: Some(puzzle_number),
            question,
            action,
        });
    }

    Ok(results)
}
