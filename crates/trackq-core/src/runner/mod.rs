//! Run controller: lock, optionally seed, drain the queue one track at a time,
//! and release the lock on every exit path.
//!
//! Ordering within a run is strict: the shrunken queue for track N is
//! persisted before the pacing delay for track N, which completes before the
//! first fetch of track N+1. The persisted queue is the only crash-recovery
//! checkpoint; a signal at any suspension point leaves it as last saved.

mod state;

use anyhow::{Context, Result};
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::TrackqConfig;
use crate::control::sleep_or_cancel;
use crate::fetcher::{Rotation, TrackFetcher};
use crate::instance_lock::InstanceLock;
use crate::pacing::PacingEngine;
use crate::paths::StatePaths;
use crate::queue::{Queue, QueueStore};
use crate::retry::{run_with_retry, RetryOutcome, RetryPolicy};
use crate::track::TrackRef;

pub use state::{RunOutcome, RunState};

pub struct Runner<F, R> {
    paths: StatePaths,
    store: QueueStore,
    fetcher: F,
    retry: RetryPolicy,
    pacing: PacingEngine,
    rotation: Rotation,
    pause_after_exhaustion: Duration,
    cancel: CancellationToken,
    rng: R,
    state: RunState,
}

impl<F, R> Runner<F, R>
where
    F: TrackFetcher,
    R: Rng,
{
    pub fn new(
        paths: StatePaths,
        cfg: &TrackqConfig,
        fetcher: F,
        rng: R,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store: QueueStore::new(&paths.queue_file),
            paths,
            fetcher,
            retry: RetryPolicy::from_config(&cfg.retry),
            pacing: PacingEngine::new(cfg.pacing.clone()),
            rotation: Rotation::from_config(cfg),
            pause_after_exhaustion: Duration::from_secs(cfg.retry.pause_after_exhaustion_secs),
            cancel,
            rng,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn enter(&mut self, next: RunState) {
        tracing::debug!(from = %self.state, to = %next, "run state");
        self.state = next;
    }

    /// Run once. When `seed` is given it replaces the queue, but only after
    /// the lock is held; a busy lock discards it.
    ///
    /// Errors are fatal conditions (lock I/O, failed queue persistence); the
    /// lock is released before they are returned.
    pub async fn run(&mut self, seed: Option<Vec<TrackRef>>) -> Result<RunOutcome> {
        self.paths.ensure_dir()?;
        self.enter(RunState::Locking);
        let mut lock = InstanceLock::new(&self.paths.lock_file);
        let acquired = lock
            .acquire()
            .with_context(|| format!("create lock: {}", self.paths.lock_file.display()))?;
        if !acquired {
            tracing::info!(
                lock = %self.paths.lock_file.display(),
                "another instance is running; exiting"
            );
            return Ok(RunOutcome::LockBusy);
        }

        let result = self.drain(seed).await;

        let released = lock.release();
        self.enter(RunState::Unlocked);
        match (&result, released) {
            (Ok(outcome), Ok(())) => tracing::info!(completed = outcome.completed(), "{}", outcome),
            (Err(e), released) => {
                tracing::error!("run failed: {:#}", e);
                if let Err(re) = released {
                    tracing::error!(
                        lock = %self.paths.lock_file.display(),
                        "failed to release lock after run failure: {}",
                        re
                    );
                }
            }
            (Ok(_), Err(e)) => {
                return Err(e).with_context(|| {
                    format!("remove lock: {}", self.paths.lock_file.display())
                });
            }
        }
        result
    }

    async fn drain(&mut self, seed: Option<Vec<TrackRef>>) -> Result<RunOutcome> {
        if let Some(tracks) = seed {
            let seeded = Queue::from(tracks);
            self.store.save(&seeded).context("seed queue")?;
            tracing::info!(tracks = seeded.len(), "queue seeded");
        }

        let mut queue = self.store.load();
        if queue.is_empty() {
            tracing::info!("queue is empty");
            self.enter(RunState::Done);
            return Ok(RunOutcome::Done { completed: 0 });
        }

        self.enter(RunState::Draining);
        tracing::info!(tracks = queue.len(), "starting queue drain");
        let mut completed = 0u64;

        while let Some(track) = queue.head().cloned() {
            let outcome = run_with_retry(
                &self.retry,
                &self.fetcher,
                &self.rotation,
                &track,
                &mut self.rng,
                &self.cancel,
            )
            .await;

            match outcome {
                RetryOutcome::Succeeded { .. } => {
                    queue.pop_head();
                    self.store
                        .save(&queue)
                        .with_context(|| format!("persist queue after {track}"))?;
                    completed += 1;
                    tracing::info!(track = %track, remaining = queue.len(), completed, "track done");
                    if queue.is_empty() {
                        break;
                    }

                    let plan = self.pacing.plan(completed - 1, &mut self.rng);
                    tracing::info!(
                        delay_secs = %format!("{:.1}", plan.total().as_secs_f64()),
                        long_break = plan.long_break,
                        mini_pause = plan.mini_pause.is_some(),
                        bonus = plan.bonus.is_some(),
                        "pacing before next track"
                    );
                    if !sleep_or_cancel(plan.total(), &self.cancel).await {
                        return Ok(self.interrupted(completed));
                    }
                }
                RetryOutcome::Exhausted { attempts } => {
                    self.enter(RunState::Paused);
                    tracing::warn!(
                        track = %track,
                        attempts,
                        "giving up on track for this run; it stays at the queue head"
                    );
                    if !sleep_or_cancel(self.pause_after_exhaustion, &self.cancel).await {
                        return Ok(self.interrupted(completed));
                    }
                    return Ok(RunOutcome::Paused { track, completed });
                }
                RetryOutcome::Cancelled { .. } => return Ok(self.interrupted(completed)),
            }
        }

        self.enter(RunState::Done);
        tracing::info!(completed, "all tracks downloaded");
        Ok(RunOutcome::Done { completed })
    }

    fn interrupted(&self, completed: u64) -> RunOutcome {
        tracing::warn!(completed, "shutdown requested");
        RunOutcome::Interrupted { completed }
    }
}
