//! File I/O boundary: saving and loading storyboard documents, and the
//! small settings file that remembers where the user last worked.
//!
//! DESIGN
//! ======
//! The core never touches the filesystem. Saving serializes through
//! `BoardStore::export_as_json`; loading hands the raw text to
//! `EngineCore::load_document`, which parses before changing anything, so a
//! bad file leaves the open document exactly as it was.
//!
//! ERROR HANDLING
//! ==============
//! Document reads and writes return [`FileIoError`]. The settings file is a
//! convenience: an unreadable one falls back to defaults and a failed write
//! is logged at `warn`.

#[cfg(test)]
#[path = "fileio_test.rs"]
mod fileio_test;

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use timeline::doc::DocumentError;
use timeline::engine::EngineCore;
use timeline::store::BoardStore;
use timeline::transport::{FrameScheduler, TransportClock};
use tracing::{debug, info, warn};

const UNTITLED: &str = "untitled.json";

#[derive(Debug, thiserror::Error)]
pub enum FileIoError {
    #[error("file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid document path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Persisted host preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub last_used_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from `path`. Missing or malformed files give defaults.
    pub async fn load(path: &Path) -> Self {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file yet");
                return Self::default();
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "settings unreadable; using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "settings malformed; using defaults");
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating its directory. Failures are logged.
    pub async fn store(&self, path: &Path) {
        if let Err(err) = self.try_store(path).await {
            warn!(path = %path.display(), error = %err, "failed to write settings");
        }
    }

    async fn try_store(&self, path: &Path) -> Result<(), FileIoError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(self).map_err(DocumentError::Serialize)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }

    fn remember_dir_of(&mut self, path: &Path) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_used_dir = Some(parent.to_path_buf());
        }
    }
}

/// Where a fresh document is offered for saving.
#[must_use]
pub fn default_save_path(settings: &Settings, documents_dir: &Path) -> PathBuf {
    settings.last_used_dir.as_deref().unwrap_or(documents_dir).join(UNTITLED)
}

/// Refuse empty paths and paths that climb out with `..`.
///
/// # Errors
///
/// Returns [`FileIoError::InvalidPath`] describing the problem.
pub fn validate_path(path: &Path) -> Result<(), FileIoError> {
    if path.as_os_str().is_empty() {
        return Err(FileIoError::InvalidPath("path is empty".into()));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(FileIoError::InvalidPath(format!("{} contains `..`", path.display())));
    }
    Ok(())
}

/// Serialize `store` to `path` and remember its directory.
///
/// # Errors
///
/// Returns [`FileIoError`] for a rejected path, an unencodable board, or a
/// failed write.
pub async fn request_save(path: &Path, store: &BoardStore, settings: &mut Settings) -> Result<(), FileIoError> {
    validate_path(path)?;
    let raw = store.export_as_json()?;
    tokio::fs::write(path, raw).await?;
    settings.remember_dir_of(path);
    info!(path = %path.display(), boards = store.len(), "document saved");
    Ok(())
}

/// Read `path` and replace the engine's document with it.
///
/// # Errors
///
/// Returns [`FileIoError`] for a rejected path, a failed read, or a
/// malformed document. The engine is untouched in every error case.
pub async fn request_load<C, S>(
    path: &Path,
    engine: &mut EngineCore<C, S>,
    settings: &mut Settings,
) -> Result<(), FileIoError>
where
    C: TransportClock,
    S: FrameScheduler,
{
    validate_path(path)?;
    let raw = tokio::fs::read_to_string(path).await?;
    engine.load_document(&raw)?;
    settings.remember_dir_of(path);
    Ok(())
}
