use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::utils;
use crate::TranscriptError;

const FALLBACK_STEM: &str = "transcript";

/// Request-scoped ephemeral storage for transcript artifacts.
///
/// Each request acquires its own temporary directory, so concurrent requests
/// never share a path. The directory is removed when the artifact that owns
/// it is dropped.
pub struct ArtifactStore {
    dir: TempDir,
}

impl ArtifactStore {
    /// Acquire a fresh storage location for one request
    pub fn for_request() -> Result<Self, TranscriptError> {
        let dir = TempDir::new().map_err(|e| {
            TranscriptError::StorageWriteFailed(format!("could not acquire temp storage: {}", e))
        })?;

        tracing::debug!("Acquired artifact storage at {}", dir.path().display());

        Ok(Self { dir })
    }

    /// Write transcript text as UTF-8 to `<name>.md` inside this store.
    ///
    /// The suggested name is sanitized for filesystem use; an empty result
    /// falls back to a generic stem. The write is verified readable before
    /// the artifact is handed back.
    pub fn write(
        self,
        text: &str,
        suggested_name: &str,
    ) -> Result<TranscriptArtifact, TranscriptError> {
        let stem = utils::sanitize_filename(suggested_name);
        let stem = if stem.is_empty() {
            FALLBACK_STEM.to_string()
        } else {
            stem
        };

        let file_name = format!("{}.md", stem);
        let path = self.dir.path().join(&file_name);

        fs_err::write(&path, text.as_bytes())
            .map_err(|e| TranscriptError::StorageWriteFailed(e.to_string()))?;

        // Confirm the artifact actually landed and is readable
        fs_err::metadata(&path)
            .map_err(|e| TranscriptError::StorageWriteFailed(e.to_string()))?;

        tracing::info!("Transcript artifact written to {}", path.display());

        Ok(TranscriptArtifact {
            file_name,
            path,
            _store: self,
        })
    }
}

/// A written transcript file, valid for as long as the value is alive.
///
/// Dropping the artifact releases the underlying storage regardless of how
/// the request ended.
pub struct TranscriptArtifact {
    file_name: String,
    path: PathBuf,
    _store: ArtifactStore,
}

impl TranscriptArtifact {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the artifact back as UTF-8 text
    pub fn read_text(&self) -> Result<String, TranscriptError> {
        fs_err::read_to_string(&self.path)
            .map_err(|e| TranscriptError::StorageWriteFailed(e.to_string()))
    }

    /// Copy the artifact out of ephemeral storage into a user-visible
    /// directory, returning the destination path.
    pub fn publish_to(&self, dir: &Path) -> Result<PathBuf, TranscriptError> {
        fs_err::create_dir_all(dir)
            .map_err(|e| TranscriptError::StorageWriteFailed(e.to_string()))?;

        let destination = dir.join(&self.file_name);
        fs_err::copy(&self.path, &destination)
            .map_err(|e| TranscriptError::StorageWriteFailed(e.to_string()))?;

        Ok(destination)
    }
}
