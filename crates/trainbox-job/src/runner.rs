use crate::artifacts::{save_artifact, ArtifactKind, ArtifactRecord};
use crate::dataset::{load_dataset_with, DatasetOptions};
use crate::error::{JobError, JobResult};
use crate::hyperparams::load_hyperparameters;
use crate::layout::JobPaths;
use crate::trainer::{SummaryTrainer, Trainer};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Outcome of a successful job.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub trainer: String,
    pub hyperparameters: usize,
    pub dataset_shape: (usize, usize),
    pub artifact: ArtifactRecord,
}

/// Runs one job: load hyperparameters, load data, train, persist.
///
/// Each step runs to completion before the next one starts and the first
/// error aborts the job unchanged. Nothing is written to the output path
/// unless every earlier step succeeded.
pub struct JobRunner {
    trainer: Box<dyn Trainer>,
    dataset_options: DatasetOptions,
}

impl JobRunner {
    #[must_use]
    pub fn new(trainer: Box<dyn Trainer>) -> Self {
        Self { trainer, dataset_options: DatasetOptions::default() }
    }

    #[must_use]
    pub fn with_dataset_options(mut self, options: DatasetOptions) -> Self {
        self.dataset_options = options;
        self
    }

    #[must_use]
    pub fn trainer_id(&self) -> &'static str {
        self.trainer.id()
    }

    #[must_use]
    pub fn artifact_kind(&self) -> ArtifactKind {
        self.trainer.artifact_kind()
    }

    pub fn execute(&self, paths: &JobPaths) -> JobResult<JobReport> {
        let trainer_id = self.trainer.id();
        info!(trainer = trainer_id, config = %paths.config.display(), data = %paths.data.display(), "job started");

        let hyperparameters = load_hyperparameters(&paths.config)?;
        info!(%hyperparameters, "training with hyperparameters");

        let dataset = load_dataset_with(&paths.data, &self.dataset_options)?;
        let (rows, cols) = dataset.shape();
        info!(rows, cols, "training data shape");

        let artifact = self.trainer.train(&hyperparameters, &dataset)?;
        if artifact.is_empty() {
            return Err(JobError::Train(format!("trainer `{trainer_id}` produced an empty artifact")));
        }

        let record = save_artifact(&artifact, &paths.output)?;
        info!(path = %record.path.display(), bytes = record.bytes, sha256 = %record.sha256, "training complete");

        Ok(JobReport {
            trainer: trainer_id.to_string(),
            hyperparameters: hyperparameters.len(),
            dataset_shape: (rows, cols),
            artifact: record,
        })
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new(Box::new(SummaryTrainer))
    }
}

/// Run a job with the default trainer. On success the artifact exists at
/// `output_path`.
pub fn run(config_path: &Path, data_path: &Path, output_path: &Path) -> JobResult<()> {
    let paths = JobPaths {
        config: config_path.to_path_buf(),
        data: data_path.to_path_buf(),
        output: output_path.to_path_buf(),
    };
    JobRunner::default().execute(&paths).map(|_| ())
}
