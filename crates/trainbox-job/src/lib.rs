//! Trainbox Job
//!
//! Single-shot training job primitives:
//! - Loading hyperparameters (`HyperparameterSet`)
//! - Loading tabular datasets (`Dataset`)
//! - Pluggable training algorithms (`Trainer`)
//! - Persisting model artifacts atomically (`save_artifact`)
//! - Running the whole pipeline (`JobRunner`, `run`)

pub mod artifacts;
pub mod dataset;
pub mod error;
pub mod hyperparams;
pub mod layout;
pub mod runner;
pub mod trainer;

pub use artifacts::{save_artifact, sha256_hex, ArtifactKind, ArtifactRecord, ModelArtifact};
pub use dataset::{load_dataset, load_dataset_with, Dataset, DatasetOptions, Record};
pub use error::{ErrorKind, JobError, JobResult};
pub use hyperparams::{load_hyperparameters, ConfigFormat, HyperValue, HyperparameterSet};
pub use layout::{JobLayout, JobPaths, DEFAULT_ML_ROOT};
pub use runner::{run, JobReport, JobRunner};
pub use trainer::{trainer_by_id, PlaceholderTrainer, SummaryTrainer, Trainer, DEFAULT_TRAINER, TRAINER_IDS};
