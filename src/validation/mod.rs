//! Puzzle validation rule engine
//!
//! Shared contract every puzzle must satisfy before it is accepted, whether
//! it came from a human author or the generator:
//! - tokenize: word splitting for the MISCAST uniqueness checks
//! - rules: per-tier and per-game thresholds
//! - miscast: accumulate-all validator for spot-the-error puzzles
//! - podium: one rule table for ranking puzzles, fail-fast or collect-all

pub mod miscast;
pub mod podium;
pub mod report;
pub mod rules;
pub mod tokenize;

pub use miscast::DayReport;
pub use report::{FailurePolicy, IssueCollector, ValidationReport};
pub use rules::{Difficulty, DifficultyRuleset};
pub use tokenize::tokenize;
