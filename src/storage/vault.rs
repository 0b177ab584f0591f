//! MISCAST vault: one `<YYYY-MM-DD>.json` file per day.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::domain::MiscastDay;
use crate::error::{PuzzleError, Result};

/// Directory of day files keyed by ISO date
#[derive(Debug, Clone)]
pub struct VaultStore {
    dir: PathBuf,
}

impl VaultStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file holding `date`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    pub fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).is_file()
    }

    /// Raw file contents, `None` when the day has no file
    pub fn read_raw(&self, date: NaiveDate) -> Result<Option<String>> {
        let path = self.path_for(date);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a full day with list-form corrections. The file appears
    /// atomically via temp file + rename.
    pub fn write_day(&self, date: NaiveDate, day: &MiscastDay) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(date);
        let tmp = path.with_extension("json.tmp");

        let day = day.clone().with_listed_corrections();
        let mut contents = serde_json::to_string_pretty(&day)?;
        contents.push('\n');
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote vault day {}", path.display());
        Ok(path)
    }

    /// Every dated file in the vault, oldest first
    pub fn list_dates(&self) -> Result<Vec<NaiveDate>> {
        let pattern = self.dir.join("*.json");
        let pattern = pattern
            .to_str()
            .ok_or_else(|| PuzzleError::Storage(format!("Non UTF-8 vault path: {}", self.dir.display())))?;

        let entries = glob::glob(pattern).map_err(|e| PuzzleError::Storage(e.to_string()))?;

        let mut dates = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| PuzzleError::Storage(e.to_string()))?;
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match NaiveDate::parse_from_str(stem, "%Y-%m-%d") {
                Ok(date) => dates.push(date),
                Err(_) => warn!("Skipping non-dated vault file {}", path.display()),
            }
        }
        dates.sort();
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Correction, ErrorSpotEntry, ErrorSpotPuzzle};
    use tempfile::TempDir;

    fn day() -> MiscastDay {
        let tier = |theme: &str| ErrorSpotPuzzle {
            id: None,
            theme: theme.to_string(),
            text: "text".to_string(),
            errors: vec![],
        };
        MiscastDay {
            easy: tier("e"),
            medium: tier("m"),
            hard: tier("h"),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_path_for_uses_iso_date() {
        let vault = VaultStore::new("/srv/vault");
        assert_eq!(vault.path_for(date(5)), PathBuf::from("/srv/vault/2026-03-05.json"));
    }

    #[test]
    fn test_read_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let vault = VaultStore::new(temp.path());
        assert!(!vault.exists(date(1)));
        assert_eq!(vault.read_raw(date(1)).unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let vault = VaultStore::new(temp.path().join("vault"));
        let path = vault.write_day(date(1), &day()).unwrap();

        assert!(path.ends_with("2026-03-01.json"));
        assert!(vault.exists(date(1)));
        assert!(!path.with_extension("json.tmp").exists());

        let raw = vault.read_raw(date(1)).unwrap().unwrap();
        let back: MiscastDay = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, day());
    }

    #[test]
    fn test_corrections_written_as_lists() {
        let temp = TempDir::new().unwrap();
        let vault = VaultStore::new(temp.path());
        let mut day = day();
        day.easy.errors.push(ErrorSpotEntry {
            wrong: "kneed".to_string(),
            right: Correction::One("need".to_string()),
        });
        day.hard.errors.push(ErrorSpotEntry {
            wrong: "there".to_string(),
            right: Correction::Many(vec!["their".to_string(), "they're".to_string()]),
        });

        vault.write_day(date(1), &day).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&vault.read_raw(date(1)).unwrap().unwrap()).unwrap();
        assert_eq!(raw["easy"]["errors"][0]["right"], serde_json::json!(["need"]));
        assert_eq!(raw["hard"]["errors"][0]["right"], serde_json::json!(["their", "they're"]));
    }

    #[test]
    fn test_list_dates_sorted_and_skips_other_files() {
        let temp = TempDir::new().unwrap();
        let vault = VaultStore::new(temp.path());
        vault.write_day(date(3), &day()).unwrap();
        vault.write_day(date(1), &day()).unwrap();
        fs::write(temp.path().join("notes.json"), "{}").unwrap();
        fs::write(temp.path().join("2026-03-02.txt"), "").unwrap();

        assert_eq!(vault.list_dates().unwrap(), vec![date(1), date(3)]);
    }

    #[test]
    fn test_list_dates_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let vault = VaultStore::new(temp.path().join("absent"));
        assert!(vault.list_dates().unwrap().is_empty());
    }
}
