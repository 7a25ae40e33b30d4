//! `run` command: execute one training job.

use crate::commands::types::RunArgs;
use crate::config::{delimiter_byte, RunnerSettings};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use trainbox_job::{trainer_by_id, DatasetOptions, JobLayout, JobPaths, JobRunner, DEFAULT_ML_ROOT, DEFAULT_TRAINER, TRAINER_IDS};

/// Resolve the trainer, dataset options and file paths for a job.
pub fn plan(args: &RunArgs, settings: &RunnerSettings) -> Result<(JobRunner, JobPaths)> {
    let trainer_id = args.trainer.as_deref().or(settings.trainer.as_deref()).unwrap_or(DEFAULT_TRAINER);
    let trainer = trainer_by_id(trainer_id).with_context(|| {
        format!("unknown trainer `{trainer_id}` (available: {})", TRAINER_IDS.join(", "))
    })?;

    let delimiter = args.delimiter.or(settings.delimiter).unwrap_or(',');
    let options = DatasetOptions { delimiter: delimiter_byte(delimiter)? };
    let runner = JobRunner::new(trainer).with_dataset_options(options);

    let root = args
        .ml_root
        .clone()
        .or_else(|| settings.ml_root.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ML_ROOT));
    let defaults = JobLayout::new(root).paths(runner.artifact_kind());
    let paths = JobPaths {
        config: args.config.clone().unwrap_or(defaults.config),
        data: args.data.clone().unwrap_or(defaults.data),
        output: args.output.clone().unwrap_or(defaults.output),
    };

    Ok((runner, paths))
}

pub fn execute(args: RunArgs, settings: &RunnerSettings) -> Result<()> {
    let (runner, paths) = plan(&args, settings)?;
    let report = runner.execute(&paths)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let (rows, cols) = report.dataset_shape;
    println!("{}", "Training complete".bold().green());
    println!("  Trainer:  {}", report.trainer.cyan());
    println!("  Data:     {rows} rows x {cols} columns");
    println!("  Artifact: {}", report.artifact.path.display().to_string().cyan());
    println!("  SHA-256:  {}", report.artifact.sha256.dimmed());
    Ok(())
}
