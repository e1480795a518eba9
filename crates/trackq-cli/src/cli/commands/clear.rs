//! `trackq clear` – delete the pending queue, under the instance lock.

use anyhow::{bail, Context, Result};
use trackq_core::instance_lock::InstanceLock;
use trackq_core::paths::StatePaths;
use trackq_core::queue::{Queue, QueueStore};

pub fn run_clear(paths: &StatePaths) -> Result<()> {
    paths.ensure_dir()?;
    let mut lock = InstanceLock::new(&paths.lock_file);
    let acquired = lock
        .acquire()
        .with_context(|| format!("create lock: {}", paths.lock_file.display()))?;
    if !acquired {
        bail!(
            "a run holds {}; wait for it to finish, or `trackq unlock` if it is stale",
            paths.lock_file.display()
        );
    }

    let store = QueueStore::new(&paths.queue_file);
    let pending = store.load().len();
    store.save(&Queue::new())?;
    lock.release()
        .with_context(|| format!("remove lock: {}", paths.lock_file.display()))?;

    tracing::info!(pending, "queue cleared");
    println!("Queue cleared ({pending} pending track(s) removed).");
    Ok(())
}
