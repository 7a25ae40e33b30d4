use crate::error::{JobError, JobResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Mode of a persisted artifact. Temp files start as 0600, which would hide
/// the artifact from consumers running as another user.
#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Text,
    Json,
    Binary,
}

impl ArtifactKind {
    /// File extension used by the default layout.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Binary => "bin",
        }
    }
}

/// Output of a trainer. Opaque to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
    kind: ArtifactKind,
    bytes: Vec<u8>,
}

impl ModelArtifact {
    #[must_use]
    pub fn new(kind: ArtifactKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    #[must_use]
    pub fn text(contents: impl Into<String>) -> Self {
        Self::new(ArtifactKind::Text, contents.into().into_bytes())
    }

    /// Pretty JSON with a trailing newline.
    pub fn json<T: Serialize>(value: &T) -> JobResult<Self> {
        let mut bytes =
            serde_json::to_vec_pretty(value).map_err(|e| JobError::Train(format!("failed to encode artifact: {e}")))?;
        bytes.push(b'\n');
        Ok(Self::new(ArtifactKind::Json, bytes))
    }

    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn sha256_hex(&self) -> String {
        sha256_hex(&self.bytes)
    }
}

/// Where an artifact ended up and what was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    pub sha256: String,
    pub bytes: u64,
}

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Persist `artifact` at `path`, replacing any existing file.
///
/// The bytes go to a temporary file next to `path` which is renamed into
/// place only after a successful write and sync. On any failure the
/// temporary file is dropped (and deleted), so `path` never holds a
/// truncated artifact.
pub fn save_artifact(artifact: &ModelArtifact, path: &Path) -> JobResult<ArtifactRecord> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| JobError::io(path, e))?;

    if path.is_dir() {
        return Err(JobError::io(path, std::io::Error::other("destination is a directory")));
    }
    if path.exists() {
        warn!(path = %path.display(), "overwriting existing artifact");
    }

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| JobError::io(path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(ARTIFACT_MODE))
            .map_err(|e| JobError::io(path, e))?;
    }
    tmp.write_all(artifact.bytes()).map_err(|e| JobError::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| JobError::io(path, e))?;
    tmp.persist(path).map_err(|e| JobError::io(path, e.error))?;

    let record = ArtifactRecord {
        path: path.to_path_buf(),
        sha256: artifact.sha256_hex(),
        bytes: artifact.len() as u64,
    };
    debug!(path = %path.display(), bytes = record.bytes, sha256 = %record.sha256, "artifact persisted");
    Ok(record)
}
