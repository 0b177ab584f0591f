//! PODIUM validate flow and output.

use chrono::NaiveDate;
use colored::*;
use log::{error, info};

use super::{Dated, RunStatus, fix_command};
use crate::alert::{self, Notifier};
use crate::check::PodiumChecker;
use crate::seed::{SeedAction, SeedResult};
use crate::storage::PodiumStore;
use crate::validation::ValidationReport;

const GAME: &str = "PODIUM";

/// Check each date, alerting once per invalid date
pub async fn validate<S: PodiumStore>(
    checker: &PodiumChecker<S>,
    dates: &[NaiveDate],
    notifier: &dyn Notifier,
) -> (RunStatus, Vec<Dated<ValidationReport>>) {
    let mut reports = Vec::with_capacity(dates.len());

    for &date in dates {
        let report = checker.check(date);
        if report.is_valid {
            info!("{}: puzzle is valid", date);
        } else {
            error!("{}: {} issue(s)", date, report.issues.len());
            for issue in &report.issues {
                error!("   - {}", issue);
            }
            notifier
                .notify(&alert::validation_failed(GAME, date, &report.issues, &fix_command(GAME, date)))
                .await;
        }
        reports.push(Dated { date, report });
    }

    let all_valid = reports.iter().all(|r| r.report.is_valid);
    if all_valid {
        info!("All {} day(s) validated", reports.len());
    }
    (RunStatus::from_valid(all_valid), reports)
}

/// Human-readable validation output, one block per date
pub fn render(reports: &[Dated<ValidationReport>]) -> String {
    let mut out = String::new();
    for dated in reports {
        if dated.report.is_valid {
            out.push_str(&format!("{} {}\n", "✅".green(), dated.date));
        } else {
            out.push_str(&format!(
                "{} {}: {} issue(s)\n",
                "❌".red(),
                dated.date,
                dated.report.issues.len()
            ));
            for issue in &dated.report.issues {
                out.push_str(&format!("   - {}\n", issue));
            }
        }
    }
    out
}

/// Human-readable seed output
pub fn render_seed(results: &[SeedResult], dry_run: bool) -> String {
    let mut out = String::new();
    for result in results {
        let number = result.puzzle_number.map(|n| format!("#{}", n)).unwrap_or_default();
        let question: String = result.question.chars().take(60).collect();
        let line = match result.action {
            SeedAction::Inserted => format!("  {} Inserted puzzle {} for {}: {}", "✅".green(), number, result.date, question),
            SeedAction::WouldInsert => format!("  [DRY RUN] Would insert puzzle {} for {}: {}", number, result.date, question),
            SeedAction::Skipped => format!("  ⏭️  Puzzle {} ({}) already exists, skipping", number, result.date),
        };
        out.push_str(&line);
        out.push('\n');
    }

    let (inserted, skipped) = SeedResult::counts(results);
    let verb = if dry_run { "Would insert" } else { "Inserted" };
    out.push_str(&format!("\nDone! {}: {}, Skipped: {}\n", verb, inserted, skipped));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::RecordingNotifier;
    use crate::storage::SqliteStore;
    use std::sync::Arc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_missing_dates_fail_and_alert_each() {
        let checker = PodiumChecker::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let notifier = RecordingNotifier::new();

        let (status, reports) = validate(&checker, &[date(1), date(2)], &notifier).await;

        assert_eq!(status, RunStatus::Failure);
        assert_eq!(reports.len(), 2);
        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("• No puzzle in DB for 2026-03-01"));
        assert!(messages[1].ends_with("Fix: `puzzlecron podium generate --date 2026-03-02 --force`"));
    }

    #[tokio::test]
    async fn test_no_dates_is_success() {
        let checker = PodiumChecker::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let (status, reports) = validate(&checker, &[], &RecordingNotifier::new()).await;
        assert_eq!(status, RunStatus::Success);
        assert!(reports.is_empty());
    }

    #[test]
    fn test_render_lists_issues() {
        let reports = vec![
            Dated {
                date: date(1),
                report: ValidationReport::pass(),
            },
            Dated {
                date: date(2),
                report: ValidationReport::from_issues(vec!["Duplicate item names".to_string()]),
            },
        ];
        let out = render(&reports);
        assert!(out.contains("2026-03-01\n"));
        assert!(out.contains("2026-03-02: 1 issue(s)\n   - Duplicate item names\n"));
    }

    #[test]
    fn test_dated_report_json() {
        let dated = Dated {
            date: date(1),
            report: ValidationReport::fail("x"),
        };
        assert_eq!(
            serde_json::to_value(&dated).unwrap(),
            serde_json::json!({"date": "2026-03-01", "is_valid": false, "issues": ["x"]})
        );
    }

    #[test]
    fn test_render_seed_summary() {
        let results = vec![
            SeedResult {
                date: date(1),
                puzzle_number: Some(1),
                question: "Rank these podcasts OLDEST to NEWEST".to_string(),
                action: SeedAction::Inserted,
            },
            SeedResult {
                date: date(2),
                puzzle_number: Some(2),
                question: "q".to_string(),
                action: SeedAction::Skipped,
            },
        ];
        let out = render_seed(&results, false);
        assert!(out.contains("Inserted puzzle #1 for 2026-03-01: Rank these podcasts"));
        assert!(out.contains("Puzzle #2 (2026-03-02) already exists, skipping"));
        assert!(out.ends_with("Done! Inserted: 1, Skipped: 1\n"));
    }
}
