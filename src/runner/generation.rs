//! Generation loop: generate, extract, validate, persist, retry.
//!
//! The loop is game-agnostic. Everything that differs between PODIUM and
//! MISCAST (prompts, rules, storage) sits behind [`PuzzleJob`].

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, error, info, warn};
use serde_json::Value;

use super::retry::{RetryPolicy, Sleeper};
use crate::domain::GenerationOutcome;
use crate::error::{PuzzleError, Result};
use crate::llm::{GenerateOptions, Generator, extract_json, preview};
use crate::prompt::with_feedback;

/// What to generate and how to treat an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub date: NaiveDate,
    /// Validate but do not persist
    pub dry_run: bool,
    /// Replace an existing record for the date
    pub force: bool,
}

impl GenerationRequest {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            dry_run: false,
            force: false,
        }
    }
}

/// One game's side of a generation run
pub trait PuzzleJob: Send + Sync {
    /// The accepted puzzle type
    type Puzzle: Send;
    /// Per-run context computed once before the first attempt
    type Plan: Send + Sync;

    /// Display name used in logs
    fn game(&self) -> &'static str;

    fn system_prompt(&self) -> &'static str;

    fn exists(&self, date: NaiveDate) -> Result<bool>;

    fn plan(&self, date: NaiveDate) -> Result<Self::Plan>;

    fn prompt(&self, date: NaiveDate, plan: &Self::Plan) -> String;

    /// Gate a candidate. Rule violations come back as `PuzzleError::Validation`.
    fn accept(&self, candidate: Value) -> Result<Self::Puzzle>;

    /// Store an accepted puzzle; `replace` deletes any prior record first
    fn persist(&self, date: NaiveDate, plan: &Self::Plan, puzzle: &Self::Puzzle, replace: bool) -> Result<()>;

    /// One-line summary for logs
    fn describe(&self, puzzle: &Self::Puzzle) -> String;
}

/// Drives an unreliable generator toward a valid, persisted puzzle
pub struct GenerationLoop<G, S>
where
    G: Generator,
    S: Sleeper,
{
    generator: Arc<G>,
    sleeper: Arc<S>,
    policy: RetryPolicy,
    options: GenerateOptions,
}

impl<G, S> GenerationLoop<G, S>
where
    G: Generator,
    S: Sleeper,
{
    /// Create a loop using the generator's model and default options
    pub fn new(generator: Arc<G>, sleeper: Arc<S>) -> Self {
        let options = GenerateOptions {
            model: generator.model().to_string(),
            ..Default::default()
        };
        Self {
            generator,
            sleeper,
            policy: RetryPolicy::default(),
            options,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Base options; temperature and system instruction are set per attempt
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Run to completion.
    ///
    /// Returns `AlreadyExists` without calling the generator when the date is
    /// taken and `force` is off, and `GenerationFailed` once the attempt
    /// budget is spent.
    pub async fn run<J: PuzzleJob>(&self, job: &J, request: &GenerationRequest) -> Result<GenerationOutcome<J::Puzzle>> {
        let date = request.date;
        let game = job.game();

        if job.exists(date)? && !request.force {
            info!("{} puzzle for {} already exists. Use --force to overwrite.", game, date);
            return Ok(GenerationOutcome::AlreadyExists);
        }

        let plan = job.plan(date)?;
        let base_prompt = job.prompt(date, &plan);
        let mut prompt = base_prompt.clone();
        let mut last_error = String::new();

        info!("Generating {} puzzle for {}", game, date);

        for attempt in 0..self.policy.max_attempts {
            if let Some(wait) = self.policy.backoff_for(attempt) {
                info!(
                    "Retrying in {}s... (attempt {}/{})",
                    wait.as_secs(),
                    attempt + 1,
                    self.policy.max_attempts
                );
                self.sleeper.sleep(wait).await;
            }

            match self.attempt(job, request, &plan, &prompt, attempt).await {
                Ok(puzzle) => {
                    let attempts = attempt + 1;
                    return Ok(if request.dry_run {
                        GenerationOutcome::DryRun { puzzle, attempts }
                    } else {
                        info!("{} puzzle for {} generated and saved", game, date);
                        GenerationOutcome::Created { puzzle, attempts }
                    });
                }
                Err(PuzzleError::Validation(issue)) => {
                    warn!("Attempt {} failed (validation): {}", attempt + 1, issue);
                    prompt = with_feedback(&base_prompt, &issue);
                    last_error = format!("Validation failed: {}", issue);
                }
                Err(e) if e.is_retryable() => {
                    match &e {
                        PuzzleError::Parse(_) => warn!("Attempt {} failed (parse): {}", attempt + 1, e),
                        _ => error!("Attempt {} failed (unexpected): {}", attempt + 1, e),
                    }
                    last_error = e.to_string();
                }
                Err(e) => return Err(e),
            }
        }

        Err(PuzzleError::GenerationFailed {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }

    async fn attempt<J: PuzzleJob>(
        &self,
        job: &J,
        request: &GenerationRequest,
        plan: &J::Plan,
        prompt: &str,
        attempt: u32,
    ) -> Result<J::Puzzle> {
        let options = GenerateOptions {
            temperature: self.policy.temperature_for(attempt),
            system_instruction: job.system_prompt().to_string(),
            ..self.options.clone()
        };

        info!("Calling generator (attempt {}, model={})...", attempt + 1, options.model);
        let raw = self.generator.generate(prompt, &options).await?;
        debug!("Raw response (first 500 chars): {}", preview(&raw, 500));

        let candidate = extract_json(&raw)?;
        let puzzle = job.accept(candidate)?;
        info!("Generated: {}", job.describe(&puzzle));

        if request.dry_run {
            info!("[DRY RUN] Not persisting {} puzzle for {}", job.game(), request.date);
        } else {
            job.persist(request.date, plan, &puzzle, request.force)?;
        }
        Ok(puzzle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockGenerator;
    use crate::runner::RecordingSleeper;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Accepts `{"value": <positive int>}` and keeps persisted values in memory
    #[derive(Default)]
    struct CounterJob {
        existing: bool,
        persisted: Mutex<Vec<(i64, bool)>>,
        fail_persist: bool,
    }

    impl PuzzleJob for CounterJob {
        type Puzzle = i64;
        type Plan = ();

        fn game(&self) -> &'static str {
            "TEST"
        }

        fn system_prompt(&self) -> &'static str {
            "system"
        }

        fn exists(&self, _date: NaiveDate) -> Result<bool> {
            Ok(self.existing)
        }

        fn plan(&self, _date: NaiveDate) -> Result<()> {
            Ok(())
        }

        fn prompt(&self, date: NaiveDate, _plan: &()) -> String {
            format!("make one for {}", date)
        }

        fn accept(&self, candidate: Value) -> Result<i64> {
            match candidate["value"].as_i64() {
                Some(v) if v > 0 => Ok(v),
                _ => Err(PuzzleError::Validation("value must be positive".to_string())),
            }
        }

        fn persist(&self, _date: NaiveDate, _plan: &(), puzzle: &i64, replace: bool) -> Result<()> {
            if self.fail_persist {
                return Err(PuzzleError::Storage("disk full".to_string()));
            }
            self.persisted.lock().unwrap().push((*puzzle, replace));
            Ok(())
        }

        fn describe(&self, puzzle: &i64) -> String {
            puzzle.to_string()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn runner(responses: &[&str]) -> (GenerationLoop<MockGenerator, RecordingSleeper>, Arc<MockGenerator>, Arc<RecordingSleeper>) {
        let generator = Arc::new(MockGenerator::with_responses(responses.iter().copied()));
        let sleeper = Arc::new(RecordingSleeper::new());
        let runner = GenerationLoop::new(generator.clone(), sleeper.clone());
        (runner, generator, sleeper)
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let (runner, generator, sleeper) = runner(&[r#"{"value": 3}"#]);
        let job = CounterJob::default();

        let outcome = runner.run(&job, &GenerationRequest::new(date())).await.unwrap();

        assert_eq!(outcome, GenerationOutcome::Created { puzzle: 3, attempts: 1 });
        assert_eq!(generator.call_count(), 1);
        assert!(sleeper.sleeps().is_empty());
        assert_eq!(*job.persisted.lock().unwrap(), vec![(3, false)]);
    }

    #[tokio::test]
    async fn test_options_per_attempt() {
        let (runner, generator, _) = runner(&["nope", r#"{"value": 1}"#]);
        let job = CounterJob::default();
        runner.run(&job, &GenerationRequest::new(date())).await.unwrap();

        let calls = generator.calls();
        assert_eq!(calls[0].options.system_instruction, "system");
        assert_eq!(calls[0].options.model, "mock-model");
        assert!((calls[0].options.temperature - 0.8).abs() < 1e-6);
        assert!((calls[1].options.temperature - 0.9).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_validation_feedback_replaces_previous() {
        let (runner, generator, _) = runner(&[r#"{"value": 0}"#, r#"{"value": -1}"#, r#"{"value": 2}"#]);
        let job = CounterJob::default();
        let outcome = runner.run(&job, &GenerationRequest::new(date())).await.unwrap();
        assert_eq!(outcome.attempts(), 3);

        let calls = generator.calls();
        assert_eq!(calls[0].prompt, "make one for 2026-03-01");
        assert_eq!(
            calls[1].prompt,
            "make one for 2026-03-01\n\nIMPORTANT: Your previous attempt had this error: value must be positive\nFix this in your new response."
        );
        assert_eq!(calls[2].prompt, calls[1].prompt);
    }

    #[tokio::test]
    async fn test_parse_failure_keeps_prompt() {
        let (runner, generator, _) = runner(&["no json here", r#"{"value": 5}"#]);
        let job = CounterJob::default();
        runner.run(&job, &GenerationRequest::new(date())).await.unwrap();
        let calls = generator.calls();
        assert_eq!(calls[0].prompt, calls[1].prompt);
    }

    #[tokio::test]
    async fn test_exhausts_budget() {
        let (runner, generator, sleeper) = runner(&["x", "x", "x", r#"{"value": 0}"#]);
        let job = CounterJob::default();

        let err = runner.run(&job, &GenerationRequest::new(date())).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to generate valid puzzle after 4 attempts. Last error: Validation failed: value must be positive"
        );
        assert_eq!(generator.call_count(), 4);
        assert_eq!(
            sleeper.sleeps(),
            vec![Duration::from_secs(2), Duration::from_secs(4), Duration::from_secs(8)]
        );
        assert!(job.persisted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generator_error_is_retried() {
        let generator = Arc::new(MockGenerator::new());
        generator.push_error("connection reset");
        generator.push_response(r#"{"value": 7}"#);
        let runner = GenerationLoop::new(generator.clone(), Arc::new(RecordingSleeper::new()));
        let job = CounterJob::default();

        let outcome = runner.run(&job, &GenerationRequest::new(date())).await.unwrap();
        assert_eq!(outcome, GenerationOutcome::Created { puzzle: 7, attempts: 2 });
    }

    #[tokio::test]
    async fn test_persist_failure_is_retried_then_reported() {
        let (runner, _, _) = runner(&[r#"{"value": 1}"#; 4]);
        let job = CounterJob {
            fail_persist: true,
            ..Default::default()
        };
        let err = runner.run(&job, &GenerationRequest::new(date())).await.unwrap_err();
        assert!(err.to_string().ends_with("Last error: Storage error: disk full"));
    }

    #[tokio::test]
    async fn test_existing_without_force_is_noop() {
        let (runner, generator, _) = runner(&[r#"{"value": 1}"#]);
        let job = CounterJob {
            existing: true,
            ..Default::default()
        };
        let outcome = runner.run(&job, &GenerationRequest::new(date())).await.unwrap();
        assert_eq!(outcome, GenerationOutcome::AlreadyExists);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_force_replaces() {
        let (runner, _, _) = runner(&[r#"{"value": 4}"#]);
        let job = CounterJob {
            existing: true,
            ..Default::default()
        };
        let request = GenerationRequest {
            force: true,
            ..GenerationRequest::new(date())
        };
        runner.run(&job, &request).await.unwrap();
        assert_eq!(*job.persisted.lock().unwrap(), vec![(4, true)]);
    }

    #[tokio::test]
    async fn test_dry_run_does_not_persist() {
        let (runner, _, _) = runner(&[r#"{"value": 9}"#]);
        let job = CounterJob::default();
        let request = GenerationRequest {
            dry_run: true,
            ..GenerationRequest::new(date())
        };
        let outcome = runner.run(&job, &request).await.unwrap();
        assert_eq!(outcome, GenerationOutcome::DryRun { puzzle: 9, attempts: 1 });
        assert!(job.persisted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let (runner, generator, _) = runner(&["x", "x"]);
        let runner = runner.with_policy(RetryPolicy {
            max_attempts: 2,
            ..Default::default()
        });
        let err = runner.run(&CounterJob::default(), &GenerationRequest::new(date())).await.unwrap_err();
        assert!(matches!(err, PuzzleError::GenerationFailed { attempts: 2, .. }));
        assert_eq!(generator.call_count(), 2);
    }

    #[test]
    fn test_candidate_shape() {
        let job = CounterJob::default();
        assert_eq!(job.accept(json!({"value": 2})).unwrap(), 2);
    }
}
