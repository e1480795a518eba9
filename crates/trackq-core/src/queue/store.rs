//! Durable queue file: load degrades to empty, save is atomic or fails loudly.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{format, Queue};

/// Suffix of the scratch file written before the atomic rename.
const TEMP_SUFFIX: &str = ".part";

fn temp_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Handle to the queue file at a fixed path.
#[derive(Debug, Clone)]
pub struct QueueStore {
    path: PathBuf,
}

impl QueueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a durable representation exists (i.e. the queue is nonempty).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the queue. Never fails: a missing file is the empty queue, and an
    /// unreadable or corrupt file is logged and treated as lost.
    pub fn load(&self) -> Queue {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no queue file");
                return Queue::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read queue: {}", e);
                return Queue::new();
            }
        };
        match format::decode(&bytes) {
            Ok(queue) => {
                tracing::debug!(path = %self.path.display(), tracks = queue.len(), "loaded queue");
                queue
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "failed to load queue, treating it as lost: {}",
                    e
                );
                Queue::new()
            }
        }
    }

    /// Persist `queue`. A nonempty queue atomically replaces the file (write
    /// `.part`, fsync, rename); an empty queue deletes it. Errors propagate.
    pub fn save(&self, queue: &Queue) -> Result<()> {
        if queue.is_empty() {
            return self.remove();
        }
        let tmp = temp_path(&self.path);
        let mut file = fs::File::create(&tmp)
            .with_context(|| format!("create queue temp file: {}", tmp.display()))?;
        file.write_all(format::encode(queue).as_bytes())
            .with_context(|| format!("write queue temp file: {}", tmp.display()))?;
        file.sync_all()
            .with_context(|| format!("sync queue temp file: {}", tmp.display()))?;
        drop(file);
        fs::rename(&tmp, &self.path).with_context(|| {
            format!("rename {} -> {}", tmp.display(), self.path.display())
        })?;
        tracing::debug!(path = %self.path.display(), tracks = queue.len(), "saved queue");
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "queue empty, removed queue file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("remove queue file: {}", self.path.display()))
            }
        }
    }
}
