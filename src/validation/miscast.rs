//! MISCAST structural validator.
//!
//! Accumulate-all: every applicable issue is reported, except that a record
//! missing required fields stops before any content checks, and a malformed
//! error entry skips its own occurrence checks.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde_json::Value;

use super::report::ValidationReport;
use super::rules::Difficulty;
use super::tokenize::{count_occurrences, tokenize};
use crate::error::{PuzzleError, Result};

const REQUIRED_FIELDS: [&str; 3] = ["theme", "text", "errors"];

/// Validate one tier's puzzle. `difficulty` is the raw tier name so an
/// unknown tier is reported rather than rejected by the type system.
pub fn validate_puzzle(puzzle: &Value, difficulty: &str) -> ValidationReport {
    let Ok(tier) = difficulty.parse::<Difficulty>() else {
        return ValidationReport::fail(format!("Unknown difficulty: {}", difficulty));
    };
    let rules = tier.rules();

    let mut issues: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| puzzle.get(**field).is_none())
        .map(|field| format!("Missing field: {}", field))
        .collect();
    if !issues.is_empty() {
        return ValidationReport::from_issues(issues);
    }

    let theme = puzzle["theme"].as_str();
    let text = puzzle["text"].as_str();
    let errors = puzzle["errors"].as_array();
    if theme.is_none() {
        issues.push("Field 'theme' must be a string".to_string());
    }
    if text.is_none() {
        issues.push("Field 'text' must be a string".to_string());
    }
    if errors.is_none() {
        issues.push("Field 'errors' must be a list".to_string());
    }
    let (Some(text), Some(errors)) = (text, errors) else {
        return ValidationReport::from_issues(issues);
    };
    if !issues.is_empty() {
        return ValidationReport::from_issues(issues);
    }

    let tokens = tokenize(text);
    let word_count = tokens.len();

    if word_count < rules.min_words {
        issues.push(format!("Too short: {} words (min {})", word_count, rules.min_words));
    }
    if word_count > rules.max_words {
        issues.push(format!("Too long: {} words (max {})", word_count, rules.max_words));
    }

    if errors.len() < rules.min_errors {
        issues.push(format!("Too few errors: {} (need {})", errors.len(), rules.min_errors));
    }
    if errors.len() > rules.max_errors {
        issues.push(format!("Too many errors: {} (max {})", errors.len(), rules.max_errors));
    }

    for (i, entry) in errors.iter().enumerate() {
        let wrong = match entry.get("wrong") {
            None | Some(Value::Null) => {
                issues.push(format!("Error {}: missing 'wrong' field", i));
                continue;
            }
            Some(Value::String(w)) => w,
            Some(_) => {
                issues.push(format!("Error {}: 'wrong' must be a string", i));
                continue;
            }
        };

        if let Some(problem) = correction_problem(entry.get("right")) {
            issues.push(format!("Error {}: {}", i, problem));
            continue;
        }

        match count_occurrences(&tokens, wrong) {
            0 => issues.push(format!("Error {}: '{}' not found in text", i, wrong)),
            1 => {}
            n => issues.push(format!("Error {}: '{}' appears {} times (must be unique)", i, wrong, n)),
        }
    }

    let wrong_words: Vec<String> = errors
        .iter()
        .filter_map(|e| e.get("wrong").and_then(Value::as_str))
        .map(str::to_lowercase)
        .collect();
    let distinct: HashSet<&String> = wrong_words.iter().collect();
    if distinct.len() != wrong_words.len() {
        issues.push("Duplicate wrong words found".to_string());
    }

    ValidationReport::from_issues(issues)
}

/// Per-tier results for one vault day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub valid: bool,
    /// Day-level failure (missing file, unreadable JSON); no tier details then
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub details: BTreeMap<Difficulty, ValidationReport>,
}

impl DayReport {
    /// A day that could not be inspected at all
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            details: BTreeMap::new(),
        }
    }

    /// Every issue prefixed with its tier, or the day-level error
    pub fn issues(&self) -> Vec<String> {
        if let Some(error) = &self.error {
            return vec![error.clone()];
        }
        self.details
            .iter()
            .flat_map(|(tier, report)| report.issues.iter().map(move |issue| format!("{}: {}", tier, issue)))
            .collect()
    }
}

/// Validate all three tiers of a parsed day record
pub fn validate_day(day: &Value) -> DayReport {
    let details: BTreeMap<Difficulty, ValidationReport> = Difficulty::ALL
        .into_iter()
        .map(|tier| {
            let report = match day.get(tier.as_str()) {
                Some(puzzle) => validate_puzzle(puzzle, tier.as_str()),
                None => ValidationReport::fail(format!("Missing {} puzzle", tier)),
            };
            (tier, report)
        })
        .collect();

    DayReport {
        valid: details.values().all(|r| r.is_valid),
        error: None,
        details,
    }
}

/// Gate a generated day: any tier issue becomes a `PuzzleError::Validation`
/// listing every issue, so a retry can fix them all at once.
pub fn check_day(day: &Value) -> Result<()> {
    let report = validate_day(day);
    if report.valid {
        Ok(())
    } else {
        Err(PuzzleError::Validation(report.issues().join("; ")))
    }
}

/// A correction is a non-blank string, or a list of strings with at least
/// one non-blank entry.
fn correction_problem(right: Option<&Value>) -> Option<&'static str> {
    const MISSING: &str = "missing or empty 'right' field";
    match right {
        Some(Value::String(s)) if !s.trim().is_empty() => None,
        Some(Value::Array(items)) => {
            if items.iter().any(|v| !v.is_string()) {
                Some("'right' must be a string or a list of strings")
            } else if items.iter().filter_map(Value::as_str).all(|s| s.trim().is_empty()) {
                Some(MISSING)
            } else {
                None
            }
        }
        _ => Some(MISSING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // 50 words
    const EASY_TEXT: &str = "Starting a podcast is easier than most people think. You do not kneed expensive \
        equipment or a fancy studio too get started. All you really need is a quiet room and a descent \
        microphone. Record an episode, listen back with fresh ears, and keep going until it feels \
        completely natural.";

    // 58 words, five errors: grate, then, thyme, moor, weak
    const MEDIUM_TEXT: &str = "Editing is where a good episode becomes grate. Most hosts record far more \
        material then they need, so the real craft lies in knowing what to cut. Remove long pauses, \
        repeated ideas and any tangent that does not serve the listener. A tight show respects your \
        audience's thyme and keeps them coming back for moor every single weak.";

    fn easy_puzzle() -> Value {
        json!({
            "theme": "Getting Started",
            "text": EASY_TEXT,
            "errors": [
                {"wrong": "kneed", "right": "need"},
                {"wrong": "too", "right": ["to"]},
                {"wrong": "descent", "right": "decent"}
            ]
        })
    }

    #[test]
    fn test_easy_fixture_has_fifty_words() {
        assert_eq!(tokenize(EASY_TEXT).len(), 50);
    }

    #[test]
    fn test_valid_easy_puzzle() {
        let report = validate_puzzle(&easy_puzzle(), "easy");
        assert!(report.is_valid, "{:?}", report.issues);
    }

    #[test]
    fn test_unknown_difficulty_stops() {
        let report = validate_puzzle(&easy_puzzle(), "expert");
        assert_eq!(report.issues, vec!["Unknown difficulty: expert"]);
    }

    #[test]
    fn test_missing_fields_reported_and_stop() {
        let report = validate_puzzle(&json!({"theme": "x"}), "easy");
        assert_eq!(report.issues, vec!["Missing field: text", "Missing field: errors"]);
    }

    #[test]
    fn test_wrong_field_types_stop() {
        let report = validate_puzzle(&json!({"theme": "x", "text": 5, "errors": {}}), "easy");
        assert_eq!(
            report.issues,
            vec!["Field 'text' must be a string", "Field 'errors' must be a list"]
        );
    }

    #[test]
    fn test_medium_with_four_errors() {
        let puzzle = json!({
            "theme": "Editing",
            "text": MEDIUM_TEXT,
            "errors": [
                {"wrong": "grate", "right": "great"},
                {"wrong": "then", "right": "than"},
                {"wrong": "thyme", "right": "time"},
                {"wrong": "moor", "right": "more"}
            ]
        });
        let report = validate_puzzle(&puzzle, "medium");
        assert_eq!(report.issues, vec!["Too few errors: 4 (need 5)"]);
    }

    #[test]
    fn test_too_many_errors_and_too_short() {
        let puzzle = json!({
            "theme": "Tiny",
            "text": "one two three four",
            "errors": [
                {"wrong": "one", "right": "1"},
                {"wrong": "two", "right": "2"},
                {"wrong": "three", "right": "3"},
                {"wrong": "four", "right": "4"}
            ]
        });
        let report = validate_puzzle(&puzzle, "easy");
        assert_eq!(
            report.issues,
            vec!["Too short: 4 words (min 25)", "Too many errors: 4 (max 3)"]
        );
    }

    #[test]
    fn test_too_long() {
        let text = vec!["word"; 81].join(" ");
        let puzzle = json!({"theme": "t", "text": text, "errors": []});
        let report = validate_puzzle(&puzzle, "easy");
        assert!(report.issues.contains(&"Too long: 81 words (max 80)".to_string()));
    }

    #[test]
    fn test_wrong_word_not_found_adds_exactly_one_issue() {
        let count = easy_puzzle()["errors"].as_array().unwrap().len();
        for i in 0..count {
            let mut puzzle = easy_puzzle();
            puzzle["errors"][i]["wrong"] = json!("zzyzx");
            let report = validate_puzzle(&puzzle, "easy");
            assert_eq!(report.issues, vec![format!("Error {}: 'zzyzx' not found in text", i)]);
        }
    }

    #[test]
    fn test_right_list_must_hold_only_strings() {
        let mut puzzle = easy_puzzle();
        puzzle["errors"][1]["right"] = json!(["to", 5]);
        let report = validate_puzzle(&puzzle, "easy");
        assert_eq!(report.issues, vec!["Error 1: 'right' must be a string or a list of strings"]);

        puzzle["errors"][1]["right"] = json!(["", "to"]);
        assert!(validate_puzzle(&puzzle, "easy").is_valid);

        puzzle["errors"][1]["right"] = json!(["  ", ""]);
        assert_eq!(
            validate_puzzle(&puzzle, "easy").issues,
            vec!["Error 1: missing or empty 'right' field"]
        );
    }

    #[test]
    fn test_duplicate_token_then_restore() {
        let mut puzzle = easy_puzzle();
        let original = puzzle["text"].as_str().unwrap().to_string();
        puzzle["text"] = json!(original.replacen("fresh ears", "kneed ears", 1));

        let report = validate_puzzle(&puzzle, "easy");
        assert_eq!(report.issues, vec!["Error 0: 'kneed' appears 2 times (must be unique)"]);

        puzzle["text"] = json!(original);
        assert!(validate_puzzle(&puzzle, "easy").is_valid);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let mut puzzle = easy_puzzle();
        puzzle["errors"][0]["wrong"] = json!("KNEED");
        assert!(validate_puzzle(&puzzle, "easy").is_valid);
    }

    #[test]
    fn test_entry_early_exits() {
        let mut puzzle = easy_puzzle();
        puzzle["errors"] = json!([
            {"right": "need"},
            {"wrong": "too", "right": ""},
            {"wrong": "descent", "right": []}
        ]);
        let report = validate_puzzle(&puzzle, "easy");
        assert_eq!(
            report.issues,
            vec![
                "Error 0: missing 'wrong' field",
                "Error 1: missing or empty 'right' field",
                "Error 2: missing or empty 'right' field",
            ]
        );
    }

    #[test]
    fn test_duplicate_wrong_words_aggregate() {
        let mut puzzle = easy_puzzle();
        puzzle["errors"][2] = json!({"wrong": "Kneed", "right": "need"});
        let report = validate_puzzle(&puzzle, "easy");
        assert_eq!(report.issues, vec!["Duplicate wrong words found"]);
    }

    #[test]
    fn test_validate_day_reports_per_tier() {
        let day = json!({"easy": easy_puzzle(), "hard": {"theme": "t"}});
        let report = validate_day(&day);

        assert!(!report.valid);
        assert!(report.details[&Difficulty::Easy].is_valid);
        assert_eq!(report.details[&Difficulty::Medium].issues, vec!["Missing medium puzzle"]);
        assert_eq!(
            report.details[&Difficulty::Hard].issues,
            vec!["Missing field: text", "Missing field: errors"]
        );
        assert_eq!(
            report.issues(),
            vec![
                "medium: Missing medium puzzle",
                "hard: Missing field: text",
                "hard: Missing field: errors",
            ]
        );
    }

    #[test]
    fn test_check_day_joins_issues() {
        let day = json!({"easy": easy_puzzle(), "medium": easy_puzzle(), "hard": easy_puzzle()});
        let err = check_day(&day).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: medium: Too few errors: 3 (need 5); "));
        assert!(!message.contains("easy:"));
    }

    #[test]
    fn test_day_report_json_shape() {
        let value = serde_json::to_value(DayReport::failed("File not found: /v/2026-03-01.json")).unwrap();
        assert_eq!(
            value,
            json!({"valid": false, "error": "File not found: /v/2026-03-01.json", "details": {}})
        );

        let value = serde_json::to_value(validate_day(&json!({"easy": easy_puzzle()}))).unwrap();
        assert_eq!(value["details"]["easy"]["is_valid"], json!(true));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_issues_accumulate() {
        let puzzle = json!({
            "theme": "t",
            "text": "short text here",
            "errors": [{"wrong": "missing", "right": "x"}]
        });
        let report = validate_puzzle(&puzzle, "hard");
        assert_eq!(
            report.issues,
            vec![
                "Too short: 3 words (min 100)",
                "Too few errors: 1 (need 7)",
                "Error 0: 'missing' not found in text",
            ]
        );
    }
}
