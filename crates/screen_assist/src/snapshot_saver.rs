//! Persists captured snapshots to disk for later inspection

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;
use crate::view::Snapshot;

/// Writes snapshots into a timestamped session directory
#[derive(Debug, Clone)]
pub struct SnapshotSaver {
    /// Base directory for saving snapshots
    base_dir: PathBuf,
    /// Session directory (created at session start with timestamp)
    session_dir: PathBuf,
    /// Request counter for ordering snapshots
    request_count: usize,
}

impl SnapshotSaver {
    /// Create a new SnapshotSaver
    ///
    /// Creates a session subdirectory named `yyyy-mm-dd_HH-MM-SS-mmm`.
    ///
    /// # Arguments
    /// * `base_dir` - Base directory for saving snapshots
    ///
    /// # Returns
    /// A new SnapshotSaver instance
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let session_dir = base_dir.join(timestamp(Local::now()));

        fs::create_dir_all(&session_dir).await?;

        info!("Snapshot session directory: {}", session_dir.display());

        Ok(Self {
            base_dir,
            session_dir,
            request_count: 0,
        })
    }

    /// Save a snapshot as pretty JSON
    ///
    /// Filename format: `request_NNN_yyyy-mm-dd_HH-MM-SS-mmm.json`
    ///
    /// # Arguments
    /// * `snapshot` - Snapshot captured for a completion request
    ///
    /// # Returns
    /// Path to the saved snapshot
    pub async fn save(&mut self, snapshot: &Snapshot) -> Result<PathBuf> {
        self.request_count += 1;

        let filename = format!(
            "request_{:03}_{}.json",
            self.request_count,
            timestamp(Local::now())
        );
        let file_path = self.session_dir.join(&filename);

        let json = snapshot.to_pretty_json()?;
        fs::write(&file_path, json.as_bytes()).await?;

        debug!(
            "Saved snapshot: {} ({} bytes)",
            file_path.display(),
            json.len()
        );

        Ok(file_path)
    }

    /// Get the session directory path
    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Get the base directory path
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the number of snapshots saved so far
    pub fn request_count(&self) -> usize {
        self.request_count
    }
}

fn timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d_%H-%M-%S-%3f").to_string()
}
