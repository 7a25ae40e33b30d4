use crate::artifacts::{ArtifactKind, ModelArtifact};
use crate::dataset::Dataset;
use crate::error::{JobError, JobResult};
use crate::hyperparams::HyperparameterSet;
use serde::Serialize;
use std::collections::BTreeSet;

/// Id of the trainer used when none is requested.
pub const DEFAULT_TRAINER: &str = SummaryTrainer::ID;

/// A training algorithm.
///
/// Implementations must be pure: no I/O, and identical inputs must yield
/// byte-identical artifacts. Persisting the result is the runner's job.
pub trait Trainer: Send + Sync {
    fn id(&self) -> &'static str;

    /// Kind of artifact `train` produces; picks the default file extension.
    fn artifact_kind(&self) -> ArtifactKind;

    fn train(&self, hyperparameters: &HyperparameterSet, dataset: &Dataset) -> JobResult<ModelArtifact>;
}

/// Writes a fixed text marker and ignores its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderTrainer;

impl PlaceholderTrainer {
    pub const ID: &'static str = "placeholder";
    pub const CONTENTS: &'static str = "Trained model artifact";
}

impl Trainer for PlaceholderTrainer {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn artifact_kind(&self) -> ArtifactKind {
        ArtifactKind::Text
    }

    fn train(&self, _hyperparameters: &HyperparameterSet, _dataset: &Dataset) -> JobResult<ModelArtifact> {
        Ok(ModelArtifact::text(Self::CONTENTS))
    }
}

/// Produces a JSON description of the dataset: shape plus per-column
/// statistics, alongside the hyperparameters it was run with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryTrainer;

impl SummaryTrainer {
    pub const ID: &'static str = "summary";
}

#[derive(Debug, Serialize)]
struct SummaryModel<'a> {
    trainer: &'static str,
    epochs: i64,
    hyperparameters: &'a HyperparameterSet,
    rows: usize,
    columns: Vec<ColumnSummary>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ColumnSummary {
    Numeric { name: String, count: usize, min: f64, max: f64, mean: f64 },
    Categorical { name: String, count: usize, distinct: usize },
}

fn summarize_column(name: &str, cells: &[&str]) -> ColumnSummary {
    let numbers: Option<Vec<f64>> = cells
        .iter()
        .map(|c| c.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();

    match numbers {
        Some(values) if !values.is_empty() => {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            ColumnSummary::Numeric { name: name.to_string(), count: values.len(), min, max, mean }
        }
        _ => {
            let distinct = cells.iter().collect::<BTreeSet<_>>().len();
            ColumnSummary::Categorical { name: name.to_string(), count: cells.len(), distinct }
        }
    }
}

impl Trainer for SummaryTrainer {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn artifact_kind(&self) -> ArtifactKind {
        ArtifactKind::Json
    }

    fn train(&self, hyperparameters: &HyperparameterSet, dataset: &Dataset) -> JobResult<ModelArtifact> {
        let epochs = hyperparameters.get_i64("epochs")?.unwrap_or(1);
        if epochs < 1 {
            return Err(JobError::config(hyperparameters.source(), "hyperparameter `epochs` must be >= 1"));
        }

        let mut columns = Vec::with_capacity(dataset.columns().len());
        for name in dataset.columns() {
            let cells: Vec<&str> = dataset.column(name).map(Iterator::collect).unwrap_or_default();
            columns.push(summarize_column(name, &cells));
        }

        let model = SummaryModel { trainer: Self::ID, epochs, hyperparameters, rows: dataset.len(), columns };
        ModelArtifact::json(&model)
    }
}

/// Ids accepted by [`trainer_by_id`].
pub const TRAINER_IDS: [&str; 2] = [PlaceholderTrainer::ID, SummaryTrainer::ID];

#[must_use]
pub fn trainer_by_id(id: &str) -> Option<Box<dyn Trainer>> {
    match id {
        PlaceholderTrainer::ID => Some(Box::new(PlaceholderTrainer)),
        SummaryTrainer::ID => Some(Box::new(SummaryTrainer)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hyperparams::ConfigFormat;

    fn hp(raw: &str) -> HyperparameterSet {
        HyperparameterSet::parse(raw, ConfigFormat::Json).unwrap()
    }

    fn dataset() -> Dataset {
        let cols = vec!["x".to_string(), "label".to_string()];
        let rows = vec![
            vec!["1".to_string(), "a".to_string()],
            vec!["2".to_string(), "b".to_string()],
            vec!["6".to_string(), "a".to_string()],
        ];
        Dataset::new(cols, rows).unwrap()
    }

    #[test]
    fn test_placeholder_writes_marker() {
        let artifact = PlaceholderTrainer.train(&hp("{}"), &dataset()).unwrap();
        assert_eq!(artifact.kind(), PlaceholderTrainer.artifact_kind());
        assert_eq!(artifact.bytes(), b"Trained model artifact");
    }

    #[test]
    fn test_summary_is_deterministic() {
        let params = hp(r#"{"lr": 0.1, "epochs": 2, "name": "run"}"#);
        let ds = dataset();
        let a = SummaryTrainer.train(&params, &ds).unwrap();
        let b = SummaryTrainer.train(&params, &ds).unwrap();
        assert_eq!(a.kind(), ArtifactKind::Json);
        assert_eq!(a.bytes(), b.bytes());
    }

    #[test]
    fn test_summary_contents() {
        let artifact = SummaryTrainer.train(&hp(r#"{"epochs": "3"}"#), &dataset()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(artifact.bytes()).unwrap();

        assert_eq!(value["trainer"], "summary");
        assert_eq!(value["epochs"], 3);
        assert_eq!(value["rows"], 3);
        assert_eq!(value["hyperparameters"]["epochs"], "3");
        assert_eq!(value["columns"][0]["type"], "numeric");
        assert_eq!(value["columns"][0]["mean"], 3.0);
        assert_eq!(value["columns"][0]["max"], 6.0);
        assert_eq!(value["columns"][1]["type"], "categorical");
        assert_eq!(value["columns"][1]["distinct"], 2);
    }

    #[test]
    fn test_summary_rejects_bad_epochs() {
        let err = SummaryTrainer.train(&hp(r#"{"epochs": 0}"#), &dataset()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = SummaryTrainer.train(&hp(r#"{"epochs": true}"#), &dataset()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_registry_knows_every_listed_id() {
        for id in TRAINER_IDS {
            assert_eq!(trainer_by_id(id).unwrap().id(), id);
        }
        assert!(trainer_by_id("xgboost").is_none());
        assert_eq!(DEFAULT_TRAINER, "summary");
    }
}
