//! MISCAST side of the generation loop: one full vault day per run.

use chrono::NaiveDate;
use log::{debug, info};
use serde_json::Value;

use super::generation::PuzzleJob;
use crate::domain::MiscastDay;
use crate::error::Result;
use crate::prompt::miscast::{SYSTEM_PROMPT, build_prompt};
use crate::storage::VaultStore;
use crate::validation::Difficulty;
use crate::validation::miscast::check_day;

/// How many earlier vault days contribute themes to avoid
pub const RECENT_DAYS: usize = 10;

/// Themes used on recent days, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiscastPlan {
    pub recent_themes: Vec<String>,
}

/// Generates a MISCAST day into a [`VaultStore`]
pub struct MiscastJob {
    vault: VaultStore,
}

impl MiscastJob {
    pub fn new(vault: VaultStore) -> Self {
        Self { vault }
    }

    /// Themes from the vault days before `date`, newest first. Unreadable
    /// days are skipped.
    fn recent_themes(&self, date: NaiveDate) -> Result<Vec<String>> {
        let dates = self.vault.list_dates()?;
        let mut themes = Vec::new();

        for day in dates.into_iter().rev().filter(|d| *d < date).take(RECENT_DAYS) {
            let Some(raw) = self.vault.read_raw(day)? else {
                continue;
            };
            let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
                debug!("Skipping unreadable vault day {}", day);
                continue;
            };
            for tier in Difficulty::ALL {
                if let Some(theme) = parsed[tier.as_str()]["theme"].as_str() {
                    themes.push(theme.to_string());
                }
            }
        }
        Ok(themes)
    }
}

impl PuzzleJob for MiscastJob {
    type Puzzle = MiscastDay;
    type Plan = MiscastPlan;

    fn game(&self) -> &'static str {
        "MISCAST"
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    fn exists(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.vault.exists(date))
    }

    fn plan(&self, date: NaiveDate) -> Result<MiscastPlan> {
        Ok(MiscastPlan {
            recent_themes: self.recent_themes(date)?,
        })
    }

    fn prompt(&self, date: NaiveDate, plan: &MiscastPlan) -> String {
        build_prompt(date, &plan.recent_themes)
    }

    fn accept(&self, candidate: Value) -> Result<MiscastDay> {
        check_day(&candidate)?;
        Ok(serde_json::from_value(candidate)?)
    }

    fn persist(&self, date: NaiveDate, _plan: &MiscastPlan, day: &MiscastDay, _replace: bool) -> Result<()> {
        let path = self.vault.write_day(date, day)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    fn describe(&self, day: &MiscastDay) -> String {
        Difficulty::ALL
            .iter()
            .map(|tier| format!("{}={:?}", tier, day.tier(*tier).theme))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
