//! Single-instance guard: a zero-length sentinel file whose presence means a
//! run owns the queue.
//!
//! This is advisory locking. Creation uses `create_new`, but a sentinel left
//! behind by a killed process still blocks later runs until it is removed
//! (`trackq unlock`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lock token. Only the instance that created the sentinel ever removes it;
/// release happens at most once and is repeated by `Drop` on unwinding paths.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    owned: bool,
}

impl InstanceLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owned: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this instance created the sentinel and has not yet released it.
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Create the sentinel. Returns `Ok(false)` without touching it when it
    /// already exists.
    pub fn acquire(&mut self) -> io::Result<bool> {
        if self.owned {
            return Ok(true);
        }
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => {
                self.owned = true;
                tracing::debug!(path = %self.path.display(), "lock acquired");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!(path = %self.path.display(), "lock held elsewhere");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the sentinel if this instance owns it; otherwise a no-op.
    pub fn release(&mut self) -> io::Result<()> {
        if !self.owned {
            return Ok(());
        }
        self.owned = false;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "lock released");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "lock sentinel vanished before release");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Whether some run currently holds the lock at `path`.
    pub fn is_held(path: &Path) -> bool {
        path.exists()
    }

    /// Remove a sentinel regardless of owner (stale lock after a crash).
    /// Returns whether a sentinel was present.
    pub fn force_remove(path: &Path) -> io::Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::error!(path = %self.path.display(), "failed to release lock: {}", e);
        }
    }
}
