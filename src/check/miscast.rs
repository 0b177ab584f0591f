//! Read-side audit of MISCAST vault days.

use chrono::NaiveDate;
use log::debug;
use serde_json::Value;

use crate::error::Result;
use crate::storage::VaultStore;
use crate::validation::DayReport;
use crate::validation::miscast::validate_day;

/// Re-validates vault files. Never writes.
#[derive(Debug, Clone)]
pub struct MiscastChecker {
    vault: VaultStore,
}

impl MiscastChecker {
    pub fn new(vault: VaultStore) -> Self {
        Self { vault }
    }

    /// Per-tier report for one day; unreadable files become a day-level error
    pub fn check_day(&self, date: NaiveDate) -> DayReport {
        let path = self.vault.path_for(date);
        debug!("Checking MISCAST day {}", path.display());

        let raw = match self.vault.read_raw(date) {
            Ok(Some(raw)) => raw,
            Ok(None) => return DayReport::failed(format!("File not found: {}", path.display())),
            Err(e) => return DayReport::failed(format!("Could not read {}: {}", path.display(), e)),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(day) => validate_day(&day),
            Err(e) => DayReport::failed(format!("Invalid JSON: {}", e)),
        }
    }

    /// Every dated file in the vault, oldest first
    pub fn check_all(&self) -> Result<Vec<(NaiveDate, DayReport)>> {
        Ok(self
            .vault
            .list_dates()?
            .into_iter()
            .map(|date| (date, self.check_day(date)))
            .collect())
    }
}
