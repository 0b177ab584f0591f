//! Best-effort failure alerts
//!
//! A [`Notifier`] never fails: dispatch errors and timeouts are logged at
//! warn level and swallowed so alerting cannot break a cron run.

use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use tokio::process::Command;

/// Placeholder in the command template replaced by the message text
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// At most this many issues are listed in one alert
pub const MAX_ALERT_ISSUES: usize = 10;

/// Longest error excerpt included in a generation alert
const MAX_ERROR_CHARS: usize = 500;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Runs an external command with the message substituted into its arguments
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    command: Vec<String>,
    timeout: Duration,
}

impl CommandNotifier {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    /// Program and arguments with the placeholder filled in
    pub fn render(&self, message: &str) -> Vec<String> {
        self.command
            .iter()
            .map(|arg| arg.replace(MESSAGE_PLACEHOLDER, message))
            .collect()
    }

    async fn dispatch(&self, message: &str) -> std::io::Result<std::process::ExitStatus> {
        let argv = self.render(message);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty alert command"))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;
        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status,
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("Alert command timed out after {}ms", self.timeout.as_millis()),
            )),
        }
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn notify(&self, message: &str) {
        match self.dispatch(message).await {
            Ok(status) if status.success() => info!("Alert sent via {}", self.command.first().map_or("", String::as_str)),
            Ok(status) => warn!("Alert command exited with {:?}", status.code()),
            Err(e) => warn!("Could not send alert: {}", e),
        }
    }
}

/// Drops every message (alerts disabled or `--no-alert`)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _message: &str) {}
}

/// Keeps messages in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// Alert text for a generation run that gave up
pub fn generation_failed(game: &str, date: NaiveDate, error: &str, rerun: &str) -> String {
    let excerpt: String = error.chars().take(MAX_ERROR_CHARS).collect();
    format!(
        "⚠️ {} puzzle generation FAILED for {}\nError: {}\nRun manually: `{}`",
        game, date, excerpt, rerun
    )
}

/// Alert text for a stored puzzle that failed re-validation
pub fn validation_failed(game: &str, date: NaiveDate, issues: &[String], fix: &str) -> String {
    let listed = issues
        .iter()
        .take(MAX_ALERT_ISSUES)
        .map(|issue| format!("• {}", issue))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "⚠️ {} puzzle validation FAILED for {}\n\nIssues:\n{}\n\nFix: `{}`",
        game, date, listed, fix
    )
}
