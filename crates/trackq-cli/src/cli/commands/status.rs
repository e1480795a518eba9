//! `trackq status` – show lock state and pending tracks.

use anyhow::Result;
use trackq_core::instance_lock::InstanceLock;
use trackq_core::paths::StatePaths;
use trackq_core::queue::QueueStore;

pub fn run_status(paths: &StatePaths) -> Result<()> {
    let lock = if InstanceLock::is_held(&paths.lock_file) {
        "held (a run is active, or a stale lock remains)"
    } else {
        "free"
    };
    println!("Lock: {lock}");

    let queue = QueueStore::new(&paths.queue_file).load();
    if queue.is_empty() {
        println!("No pending tracks.");
    } else {
        println!("{} pending track(s):", queue.len());
        println!("{:<6} {}", "POS", "TRACK");
        for (i, track) in queue.iter().enumerate() {
            println!("{:<6} {}", i + 1, track);
        }
    }
    Ok(())
}
