//! Command flows shared by the binary and the integration tests
//!
//! Each flow wires a runner or checker to a notifier, decides the process
//! status and renders output. Nothing here touches argv or the environment.

pub mod miscast;
pub mod podium;

use chrono::NaiveDate;
use log::{error, info};
use serde::Serialize;

use crate::alert::{self, Notifier};
use crate::domain::GenerationOutcome;
use crate::llm::Generator;
use crate::runner::{GenerationLoop, GenerationRequest, PuzzleJob, Sleeper};

/// Process-level result of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Created, dry-run passed, or everything validated
    Success,
    /// Generation failed or something is invalid (an alert was raised)
    Failure,
    /// The date already had a puzzle; nothing was done
    AlreadyExists,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failure => 1,
            RunStatus::AlreadyExists => 2,
        }
    }

    /// Success when every item passed, Failure otherwise
    pub fn from_valid(all_valid: bool) -> Self {
        if all_valid { RunStatus::Success } else { RunStatus::Failure }
    }
}

/// Result of a generate command
#[derive(Debug)]
pub enum GenerateResult<P> {
    Done(GenerationOutcome<P>),
    /// The run gave up; carries the error text that went into the alert
    Failed(String),
}

impl<P> GenerateResult<P> {
    pub fn status(&self) -> RunStatus {
        match self {
            GenerateResult::Done(GenerationOutcome::AlreadyExists) => RunStatus::AlreadyExists,
            GenerateResult::Done(_) => RunStatus::Success,
            GenerateResult::Failed(_) => RunStatus::Failure,
        }
    }
}

/// A report tagged with the date it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dated<R> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub report: R,
}

/// Run one generation and alert on failure
pub async fn generate<J, G, S>(
    runner: &GenerationLoop<G, S>,
    job: &J,
    request: &GenerationRequest,
    notifier: &dyn Notifier,
) -> GenerateResult<J::Puzzle>
where
    J: PuzzleJob,
    G: Generator,
    S: Sleeper,
{
    let game = job.game();
    match runner.run(job, request).await {
        Ok(outcome) => {
            match &outcome {
                GenerationOutcome::Created { attempts, .. } => {
                    info!("{} puzzle for {} created after {} attempt(s)", game, request.date, attempts)
                }
                GenerationOutcome::DryRun { attempts, .. } => {
                    info!("[DRY RUN] {} puzzle for {} valid after {} attempt(s)", game, request.date, attempts)
                }
                GenerationOutcome::AlreadyExists => info!("{} puzzle for {} already exists. Nothing to do.", game, request.date),
            }
            GenerateResult::Done(outcome)
        }
        Err(e) => {
            let message = e.to_string();
            error!("{} generation failed: {}", game, message);
            notifier
                .notify(&alert::generation_failed(game, request.date, &message, &rerun_command(game, request.date)))
                .await;
            GenerateResult::Failed(message)
        }
    }
}

/// Rerun command suggested in generation alerts
pub fn rerun_command(game: &str, date: NaiveDate) -> String {
    format!(
        "{} {} generate --date {} --verbose",
        env!("CARGO_PKG_NAME"),
        game.to_lowercase(),
        date
    )
}

/// Fix command suggested in validation alerts
pub fn fix_command(game: &str, date: NaiveDate) -> String {
    format!(
        "{} {} generate --date {} --force",
        env!("CARGO_PKG_NAME"),
        game.to_lowercase(),
        date
    )
}
