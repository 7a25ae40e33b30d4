use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type JobResult<T> = std::result::Result<T, JobError>;

/// Terminal failure of a job. None of these are retried.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid dataset {}: {message}", path.display())]
    Data { path: PathBuf, message: String },

    #[error("cannot persist artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("trainer error: {0}")]
    Train(String),
}

/// Coarse classification reported on the diagnostic stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Data,
    Io,
    Train,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Config => "ConfigError",
            Self::Data => "DataError",
            Self::Io => "IOError",
            Self::Train => "TrainError",
        };
        f.write_str(name)
    }
}

impl JobError {
    pub fn config(path: &Path, message: impl Into<String>) -> Self {
        Self::Config { path: path.to_path_buf(), message: message.into() }
    }

    pub fn data(path: &Path, message: impl Into<String>) -> Self {
        Self::Data { path: path.to_path_buf(), message: message.into() }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Data { .. } => ErrorKind::Data,
            Self::Io { .. } => ErrorKind::Io,
            Self::Train(_) => ErrorKind::Train,
        }
    }
}
