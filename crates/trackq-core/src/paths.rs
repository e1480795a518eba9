//! Locations of the queue file and lock sentinel.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::TrackqConfig;

pub const QUEUE_FILE: &str = "queue.txt";
pub const LOCK_FILE: &str = "trackq.lock";

/// Queue and lock paths under one state directory.
#[derive(Debug, Clone)]
pub struct StatePaths {
    pub dir: PathBuf,
    pub queue_file: PathBuf,
    pub lock_file: PathBuf,
}

impl StatePaths {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            queue_file: dir.join(QUEUE_FILE),
            lock_file: dir.join(LOCK_FILE),
            dir,
        }
    }

    /// `state_dir` from config, else `~/.local/state/trackq`.
    pub fn resolve(cfg: &TrackqConfig) -> Result<Self> {
        if let Some(dir) = &cfg.state_dir {
            return Ok(Self::in_dir(dir));
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("trackq")?;
        let queue_file = xdg_dirs.get_state_file(QUEUE_FILE);
        let dir = queue_file
            .parent()
            .context("state file path has no parent")?
            .to_path_buf();
        Ok(Self::in_dir(dir))
    }

    /// Create the state directory if needed.
    pub fn ensure_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create state dir: {}", self.dir.display()))?;
        Ok(&self.dir)
    }
}
