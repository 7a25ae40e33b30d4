use crate::artifacts::ArtifactKind;
use std::path::{Path, PathBuf};

/// Root used by managed training containers.
pub const DEFAULT_ML_ROOT: &str = "/opt/ml";

/// The three files a job touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    pub config: PathBuf,
    pub data: PathBuf,
    pub output: PathBuf,
}

/// Conventional file locations under an ML root:
///
/// ```text
/// <root>/input/config/hyperparameters.json
/// <root>/input/data/training/train.csv
/// <root>/model/model.<ext>
/// ```
#[derive(Debug, Clone)]
pub struct JobLayout {
    root: PathBuf,
}

impl JobLayout {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join("input").join("config").join("hyperparameters.json")
    }

    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.root.join("input").join("data").join("training").join("train.csv")
    }

    #[must_use]
    pub fn model_dir(&self) -> PathBuf {
        self.root.join("model")
    }

    #[must_use]
    pub fn artifact_path(&self, kind: ArtifactKind) -> PathBuf {
        self.model_dir().join(format!("model.{}", kind.extension()))
    }

    #[must_use]
    pub fn paths(&self, kind: ArtifactKind) -> JobPaths {
        JobPaths { config: self.config_path(), data: self.data_path(), output: self.artifact_path(kind) }
    }
}

impl Default for JobLayout {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_ML_ROOT))
    }
}
