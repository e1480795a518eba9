//! `trackq unlock` – remove a stale lock sentinel left by a killed run.

use anyhow::{Context, Result};
use trackq_core::instance_lock::InstanceLock;
use trackq_core::paths::StatePaths;

pub fn run_unlock(paths: &StatePaths) -> Result<()> {
    let removed = InstanceLock::force_remove(&paths.lock_file)
        .with_context(|| format!("remove lock: {}", paths.lock_file.display()))?;
    if removed {
        tracing::warn!(path = %paths.lock_file.display(), "lock removed by operator");
        println!("Removed lock {}", paths.lock_file.display());
    } else {
        println!("No lock present.");
    }
    Ok(())
}
