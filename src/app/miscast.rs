//! MISCAST validate flow and output.

use chrono::NaiveDate;
use colored::*;
use log::{error, info};

use super::{Dated, RunStatus, fix_command};
use crate::alert::{self, Notifier};
use crate::check::MiscastChecker;
use crate::error::Result;
use crate::validation::DayReport;

const GAME: &str = "MISCAST";

/// Which days to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Dates(Vec<NaiveDate>),
    /// Every dated file in the vault
    All,
}

/// Check the selected days, alerting once per invalid day
pub async fn validate(
    checker: &MiscastChecker,
    selection: &Selection,
    notifier: &dyn Notifier,
) -> Result<(RunStatus, Vec<Dated<DayReport>>)> {
    let checked: Vec<(NaiveDate, DayReport)> = match selection {
        Selection::Dates(dates) => dates.iter().map(|&d| (d, checker.check_day(d))).collect(),
        Selection::All => checker.check_all()?,
    };

    let mut reports = Vec::with_capacity(checked.len());
    for (date, report) in checked {
        if report.valid {
            info!("{}: all tiers valid", date);
        } else {
            let issues = report.issues();
            error!("{}: {} issue(s)", date, issues.len());
            notifier
                .notify(&alert::validation_failed(GAME, date, &issues, &fix_command(GAME, date)))
                .await;
        }
        reports.push(Dated { date, report });
    }

    let all_valid = reports.iter().all(|r| r.report.valid);
    Ok((RunStatus::from_valid(all_valid), reports))
}

/// Human-readable output: a status line per day, then one line per tier
pub fn render(reports: &[Dated<DayReport>]) -> String {
    let mut out = String::new();
    for dated in reports {
        if let Some(error) = &dated.report.error {
            out.push_str(&format!("{} {}: {}\n", "❌".red(), dated.date, error));
            continue;
        }

        out.push_str(&format!("{} {}\n", mark(dated.report.valid), dated.date));
        for (tier, report) in &dated.report.details {
            out.push_str(&format!("  {} {}", mark(report.is_valid), tier));
            if !report.issues.is_empty() {
                out.push_str(&format!(": {}", report.summary()));
            }
            out.push('\n');
        }
    }
    out
}

fn mark(valid: bool) -> ColoredString {
    if valid { "✅".green() } else { "❌".red() }
}
