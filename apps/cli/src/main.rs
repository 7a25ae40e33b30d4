//! Trainbox CLI - single-shot training job runner
//!
//! Loads hyperparameters and a tabular dataset, runs a trainer and writes
//! one model artifact. Exit status reports which stage failed.

mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use trainbox_job::{ErrorKind, JobError};

use commands::{run, trainers, RunArgs};
use config::RunnerSettings;

/// Trainbox - run one training job and persist its artifact
#[derive(Parser, Debug)]
#[command(name = "trainbox", author, version, about = "Trainbox - single-shot training job runner")]
struct Args {
    /// Log level or filter directives (e.g. `debug`, `info,trainbox_job=trace`)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Settings file (defaults to ./.trainboxrc when present)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one training job
    ///
    /// Loads the hyperparameters and dataset, trains, and writes the artifact.
    /// Paths not given explicitly come from the layout under --ml-root.
    Run(RunArgs),

    /// List built-in trainers
    Trainers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn exit_code_for(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Config => 3,
        ErrorKind::Data => 4,
        ErrorKind::Io => 5,
        ErrorKind::Train => 6,
    }
}

/// Accepts a bare level (`debug`) or full directives (`info,trainbox_job=trace`).
fn log_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("invalid log level `{directives}`"))
}

fn init_tracing(filter: EnvFilter) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let settings = RunnerSettings::discover(args.settings.as_deref())?;

    let level = args.log_level.as_deref().or(settings.log_level.as_deref()).unwrap_or("info");
    init_tracing(log_filter(level)?)?;

    match args.command {
        Command::Run(run_args) => run::execute(run_args, &settings),
        Command::Trainers { json } => trainers::execute(json),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(job_err) = err.downcast_ref::<JobError>() {
                let kind = job_err.kind();
                eprintln!("{kind}: {job_err}");
                ExitCode::from(exit_code_for(kind))
            } else {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        }
    }
}
