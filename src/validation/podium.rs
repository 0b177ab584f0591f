//! PODIUM structural validator.
//!
//! One ordered rule table, driven either fail-fast (generation gate) or
//! collect-all (read-side audit) through an [`IssueCollector`]. Each rule
//! returns `ControlFlow<()>`, so `?` ends a fail-fast run at the first issue.

use std::collections::HashSet;
use std::ops::ControlFlow;

use serde_json::Value;

use super::report::{FailurePolicy, IssueCollector, ValidationReport};
use super::rules::{
    MIN_FUN_FACT_CHARS, MIN_QUESTION_CHARS, RANKING_ITEM_COUNT, RANKING_ITEM_FIELDS, RANKING_ITEM_IDS,
    RANKING_REQUIRED_FIELDS, RANKING_TEXT_FIELDS,
};
use crate::domain::RankingPuzzle;
use crate::error::{PuzzleError, Result};

/// Run every rule against a raw record under `policy`.
pub fn validate_puzzle(puzzle: &Value, policy: FailurePolicy) -> ValidationReport {
    let mut collector = IssueCollector::new(policy);
    let _ = run_rules(puzzle, &mut collector);
    collector.into_report()
}

/// Fail-fast gate: the first violation becomes a `PuzzleError::Validation`.
pub fn check_puzzle(puzzle: &Value) -> Result<()> {
    let report = validate_puzzle(puzzle, FailurePolicy::FailFast);
    match report.issues.into_iter().next() {
        Some(issue) => Err(PuzzleError::Validation(issue)),
        None => Ok(()),
    }
}

/// Top-level text rules only, for records whose items could not be decoded.
pub fn validate_fields(puzzle: &Value, policy: FailurePolicy) -> ValidationReport {
    let mut collector = IssueCollector::new(policy);
    let _ = run_field_rules(puzzle, &mut collector);
    collector.into_report()
}

/// Gate a raw record and convert it into a typed puzzle.
pub fn parse_puzzle(puzzle: Value) -> Result<RankingPuzzle> {
    check_puzzle(&puzzle)?;
    Ok(serde_json::from_value(puzzle)?)
}

fn run_rules(puzzle: &Value, c: &mut IssueCollector) -> ControlFlow<()> {
    for field in RANKING_REQUIRED_FIELDS {
        if puzzle.get(field).is_none() {
            c.report(format!("Missing required field: '{}'", field))?;
        }
    }

    match puzzle.get("items") {
        Some(Value::Array(items)) => check_items(items, c)?,
        Some(_) => c.report("items must be a list")?,
        None => {}
    }

    run_field_rules(puzzle, c)
}

fn run_field_rules(puzzle: &Value, c: &mut IssueCollector) -> ControlFlow<()> {
    check_text_fields(puzzle, c)?;
    check_lengths(puzzle, c)
}

fn check_items(items: &[Value], c: &mut IssueCollector) -> ControlFlow<()> {
    if items.len() != RANKING_ITEM_COUNT {
        c.report(format!(
            "items must have exactly {} elements, got {}",
            RANKING_ITEM_COUNT,
            items.len()
        ))?;
    }

    for (i, item) in items.iter().take(RANKING_ITEM_COUNT).enumerate() {
        check_item(i, item, c)?;
    }

    check_strictly_increasing(items, c)?;
    check_unique_names(items, c)
}

fn check_item(i: usize, item: &Value, c: &mut IssueCollector) -> ControlFlow<()> {
    if !item.is_object() {
        return c.report(format!("Item {} must be an object", i));
    }

    for field in RANKING_ITEM_FIELDS {
        if item.get(field).is_none() {
            c.report(format!("Item {} missing field '{}'", i, field))?;
        }
    }

    if let Some(id) = item.get("id") {
        let expected = RANKING_ITEM_IDS[i];
        if id.as_str() != Some(expected) {
            c.report(format!("Item {} has id {}, expected '{}'", i, repr(id), expected))?;
        }
    }

    if let Some(name) = item.get("name") {
        if !is_filled(name) {
            c.report(format!("Item {} has invalid name", i))?;
        }
    }

    if let Some(sort_value) = item.get("sort_value") {
        if !sort_value.is_number() {
            c.report(format!(
                "Item {} sort_value must be numeric, got {}",
                i,
                type_name(sort_value)
            ))?;
        }
    }

    if let Some(display) = item.get("display_value") {
        if !is_filled(display) {
            c.report(format!("Item {} has invalid display_value", i))?;
        }
    }

    ControlFlow::Continue(())
}

/// Ties are violations. Pairs with a non-numeric side were already reported.
fn check_strictly_increasing(items: &[Value], c: &mut IssueCollector) -> ControlFlow<()> {
    for (i, pair) in items.windows(2).enumerate() {
        let (Some(a), Some(b)) = (pair[0].get("sort_value"), pair[1].get("sort_value")) else {
            continue;
        };
        let (Some(av), Some(bv)) = (a.as_f64(), b.as_f64()) else {
            continue;
        };
        if av >= bv {
            c.report(format!(
                "sort_values must be strictly increasing: item[{}]={} >= item[{}]={}",
                i,
                a,
                i + 1,
                b
            ))?;
        }
    }
    ControlFlow::Continue(())
}

fn check_unique_names(items: &[Value], c: &mut IssueCollector) -> ControlFlow<()> {
    let names: Vec<&str> = items
        .iter()
        .filter_map(|item| item.get("name").and_then(Value::as_str))
        .collect();
    let distinct: HashSet<&str> = names.iter().copied().collect();
    if distinct.len() != names.len() {
        c.report("Duplicate item names")?;
    }
    ControlFlow::Continue(())
}

fn check_text_fields(puzzle: &Value, c: &mut IssueCollector) -> ControlFlow<()> {
    for field in RANKING_TEXT_FIELDS {
        match puzzle.get(field) {
            None => {}
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            Some(Value::String(_)) => c.report(format!("'{}' must not be empty", field))?,
            Some(_) => c.report(format!("'{}' must be a string", field))?,
        }
    }
    ControlFlow::Continue(())
}

fn check_lengths(puzzle: &Value, c: &mut IssueCollector) -> ControlFlow<()> {
    let filled = |field: &str| puzzle.get(field).and_then(Value::as_str).filter(|s| !s.trim().is_empty());

    if let Some(question) = filled("question") {
        if question.chars().count() < MIN_QUESTION_CHARS {
            c.report(format!("question seems too short: '{}'", question))?;
        }
    }
    if let Some(fun_fact) = filled("fun_fact") {
        if fun_fact.chars().count() < MIN_FUN_FACT_CHARS {
            c.report(format!("fun_fact seems too short: '{}'", fun_fact))?;
        }
    }
    ControlFlow::Continue(())
}

fn is_filled(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

fn repr(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
