//! Command type definitions shared between main.rs and tests.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Hyperparameter file (JSON, or TOML with a .toml extension)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Training dataset (delimited text with a header row)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Where to write the model artifact
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Root of the conventional layout used for paths not given explicitly
    #[arg(long)]
    pub ml_root: Option<PathBuf>,

    /// Trainer to use (see `trainers`)
    #[arg(long)]
    pub trainer: Option<String>,

    /// Dataset field delimiter
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Print the job report as JSON
    #[arg(long)]
    pub json: bool,
}
