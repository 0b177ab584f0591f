//! Read-side audit of stored PODIUM puzzles.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, error};
use serde_json::{Map, Value};

use crate::storage::{PodiumRow, PodiumStore};
use crate::validation::podium::{validate_fields, validate_puzzle};
use crate::validation::{FailurePolicy, ValidationReport};

/// Re-validates whatever is stored for a date. Never writes.
pub struct PodiumChecker<S: PodiumStore> {
    store: Arc<S>,
}

impl<S: PodiumStore> PodiumChecker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Every problem with the stored record for `date`, as issues.
    ///
    /// A missing row, an unreadable `items_json` and a storage failure are
    /// issues too; nothing here returns an error.
    pub fn check(&self, date: NaiveDate) -> ValidationReport {
        debug!("Checking PODIUM puzzle for {}", date);
        match self.store.select(date) {
            Ok(Some(row)) => check_row(row),
            Ok(None) => ValidationReport::fail(format!("No puzzle in DB for {}", date)),
            Err(e) => {
                error!("DB error checking {}: {}", date, e);
                ValidationReport::fail(format!("DB error: {}", e))
            }
        }
    }
}

fn check_row(row: PodiumRow) -> ValidationReport {
    let mut record = Map::new();
    for (field, value) in [
        ("question", row.question),
        ("direction", row.direction),
        ("category", row.category),
        ("emoji", row.emoji),
        ("fun_fact", row.fun_fact),
    ] {
        record.insert(field.to_string(), Value::String(value.unwrap_or_default()));
    }

    let items_json = row.items_json.unwrap_or_default();
    if items_json.trim().is_empty() {
        return fields_then(record, "items_json is empty".to_string());
    }

    match serde_json::from_str::<Value>(&items_json) {
        Ok(items) => {
            record.insert("items".to_string(), items);
            validate_puzzle(&Value::Object(record), FailurePolicy::CollectAll)
        }
        Err(e) => fields_then(record, format!("items_json is invalid JSON: {}", e)),
    }
}

/// Text-field issues followed by the items problem
fn fields_then(record: Map<String, Value>, items_issue: String) -> ValidationReport {
    let mut report = validate_fields(&Value::Object(record), FailurePolicy::CollectAll);
    report.add_issue(items_issue);
    report
}
