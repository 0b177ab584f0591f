//! Validation report and the issue collector shared by both games.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

/// Result of validating one puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether validation passed (always `issues.is_empty()`)
    pub is_valid: bool,
    /// Human-readable issues, in the order the rules ran
    pub issues: Vec<String>,
}

impl ValidationReport {
    /// Create a passing report
    pub fn pass() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
        }
    }

    /// Create a failing report with a single issue
    pub fn fail(issue: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            issues: vec![issue.into()],
        }
    }

    /// Build a report from collected issues
    pub fn from_issues(issues: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }

    /// Add an issue to this report
    pub fn add_issue(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
        self.is_valid = false;
    }

    /// Issues joined with "; " for one-line summaries and retry prompts
    pub fn summary(&self) -> String {
        self.issues.join("; ")
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::pass()
    }
}

/// How a rule run reacts to the first violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first violation (generation gate)
    FailFast,
    /// Evaluate every rule (read-side audit)
    CollectAll,
}

/// Accumulates issues and tells rules whether to keep going.
///
/// Rules return `ControlFlow<()>` and call `report(..)?`, so a fail-fast run
/// unwinds at the first issue while a collect-all run continues.
#[derive(Debug)]
pub struct IssueCollector {
    policy: FailurePolicy,
    issues: Vec<String>,
}

impl IssueCollector {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            issues: Vec::new(),
        }
    }

    /// Record an issue; breaks under `FailFast`.
    pub fn report(&mut self, issue: impl Into<String>) -> ControlFlow<()> {
        self.issues.push(issue.into());
        match self.policy {
            FailurePolicy::FailFast => ControlFlow::Break(()),
            FailurePolicy::CollectAll => ControlFlow::Continue(()),
        }
    }

    pub fn into_report(self) -> ValidationReport {
        ValidationReport::from_issues(self.issues)
    }
}
