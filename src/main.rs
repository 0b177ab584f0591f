use chrono::Local;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{debug, error, info};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, GenerateArgs, MiscastCommands, PodiumCommands, ValidateArgs, tomorrow};
use config::Config;

use puzzlecron::alert::{self, CommandNotifier, NoopNotifier, Notifier};
use puzzlecron::app::{self, GenerateResult, RunStatus};
use puzzlecron::check::{MiscastChecker, PodiumChecker, date_range};
use puzzlecron::domain::GenerationOutcome;
use puzzlecron::llm::{AnthropicConfig, AnthropicGenerator, GenerateOptions};
use puzzlecron::runner::{GenerationLoop, GenerationRequest, MiscastJob, PodiumJob, PuzzleJob, TokioSleeper};
use puzzlecron::seed;
use puzzlecron::storage::{SqliteStore, VaultStore};

fn setup_logging(cli: &Cli, config: &Config) {
    let level = if cli.is_verbose() {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };

    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(path) = &cli.database {
        config.storage.database_path = path.clone();
    }
    if let Some(dir) = &cli.vault_dir {
        config.storage.vault_dir = dir.clone();
    }
    Ok(config)
}

fn notifier(config: &Config, no_alert: bool) -> Box<dyn Notifier> {
    if no_alert || !config.alert.enabled {
        debug!("Alerts disabled");
        Box::new(NoopNotifier)
    } else {
        Box::new(CommandNotifier::new(config.alert.command.clone(), config.alert.timeout()))
    }
}

fn open_store(config: &Config) -> Result<Arc<SqliteStore>> {
    let path = &config.storage.database_path;
    let store = SqliteStore::open(path).context(format!("Failed to open database {}", path.display()))?;
    Ok(Arc::new(store))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<RunStatus> {
    match &cli.command {
        Commands::Podium { command } => handle_podium_command(command, config).await,
        Commands::Miscast { command } => handle_miscast_command(command, config).await,
    }
}

async fn handle_podium_command(command: &PodiumCommands, config: &Config) -> Result<RunStatus> {
    match command {
        PodiumCommands::Generate(args) => {
            let job = PodiumJob::new(open_store(config)?);
            handle_generate(&job, args, config).await
        }
        PodiumCommands::Validate(args) => {
            let checker = PodiumChecker::new(open_store(config)?);
            let dates = validate_dates(args);
            let notifier = notifier(config, args.no_alert);
            let (status, reports) = app::podium::validate(&checker, &dates, notifier.as_ref()).await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print!("{}", app::podium::render(&reports));
            }
            Ok(status)
        }
        PodiumCommands::Seed {
            file,
            start_date,
            dry_run,
        } => {
            let entries = seed::load_seed_file(file).context(format!("Failed to load seed file {}", file.display()))?;
            let start = start_date.unwrap_or_else(|| Local::now().date_naive());
            info!("Seeding {} puzzle(s) from {} starting {}", entries.len(), file.display(), start);

            let store = open_store(config)?;
            let results = seed::seed(store.as_ref(), &entries, start, *dry_run)?;
            print!("{}", app::podium::render_seed(&results, *dry_run));
            Ok(RunStatus::Success)
        }
    }
}

async fn handle_miscast_command(command: &MiscastCommands, config: &Config) -> Result<RunStatus> {
    let vault = VaultStore::new(&config.storage.vault_dir);
    match command {
        MiscastCommands::Generate(args) => {
            let job = MiscastJob::new(vault);
            handle_generate(&job, args, config).await
        }
        MiscastCommands::Validate { args, all } => {
            let checker = MiscastChecker::new(vault);
            let selection = if *all {
                app::miscast::Selection::All
            } else {
                app::miscast::Selection::Dates(validate_dates(args))
            };
            let notifier = notifier(config, args.no_alert);
            let (status, reports) = app::miscast::validate(&checker, &selection, notifier.as_ref()).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print!("{}", app::miscast::render(&reports));
            }
            Ok(status)
        }
    }
}

fn validate_dates(args: &ValidateArgs) -> Vec<chrono::NaiveDate> {
    date_range(args.date.unwrap_or_else(tomorrow), args.days)
}

async fn handle_generate<J>(job: &J, args: &GenerateArgs, config: &Config) -> Result<RunStatus>
where
    J: PuzzleJob,
    J::Puzzle: Serialize,
{
    let date = args.date.unwrap_or_else(tomorrow);
    let notifier = notifier(config, args.no_alert);
    let model = args.model.clone().unwrap_or_else(|| config.llm.model.clone());

    let generator_config = AnthropicConfig {
        model: model.clone(),
        timeout: config.llm.timeout(),
    };
    let generator = match AnthropicGenerator::from_env(&config.llm.api_key_env, generator_config) {
        Ok(generator) => generator,
        Err(e) => {
            error!("{} generation failed: {}", job.game(), e);
            notifier
                .notify(&alert::generation_failed(
                    job.game(),
                    date,
                    &e.to_string(),
                    &app::rerun_command(job.game(), date),
                ))
                .await;
            return Ok(RunStatus::Failure);
        }
    };

    let policy = config.generation.retry_policy();
    let options = GenerateOptions {
        model,
        temperature: policy.base_temperature,
        max_tokens: config.llm.max_tokens,
        system_instruction: String::new(),
    };
    let runner = GenerationLoop::new(Arc::new(generator), Arc::new(TokioSleeper))
        .with_policy(policy)
        .with_options(options);

    let request = GenerationRequest {
        date,
        dry_run: args.dry_run,
        force: args.force,
    };
    let result = app::generate(&runner, job, &request, notifier.as_ref()).await;

    match &result {
        GenerateResult::Done(GenerationOutcome::DryRun { puzzle, .. }) => {
            println!("{}", serde_json::to_string_pretty(puzzle)?);
        }
        GenerateResult::Done(GenerationOutcome::Created { puzzle, .. }) => {
            println!("{} {} {}", "✅".green(), date, job.describe(puzzle));
        }
        GenerateResult::Done(GenerationOutcome::AlreadyExists) => {
            println!("{} {} already has a {} puzzle", "⏭️ ".yellow(), date, job.game());
        }
        GenerateResult::Failed(message) => {
            eprintln!("{} {}", "❌".red(), message);
        }
    }

    Ok(result.status())
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:?}", "Error:".red(), e);
            return ExitCode::from(RunStatus::Failure.code());
        }
    };

    setup_logging(&cli, &config);
    debug!("Starting with config from: {:?}", cli.config);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build();
    let result = runtime
        .context("Failed to start runtime")
        .and_then(|rt| rt.block_on(run_application(&cli, &config)));

    match result {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            error!("{:?}", e);
            eprintln!("{} {:?}", "Error:".red(), e);
            ExitCode::from(RunStatus::Failure.code())
        }
    }
}
