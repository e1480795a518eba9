//! Run states and outcomes.

use std::fmt;

use crate::track::TrackRef;

/// States of one run: `Idle → Locking → Draining → {Paused, Done} → Unlocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Locking,
    Draining,
    Paused,
    Done,
    Unlocked,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Locking => "locking",
            RunState::Draining => "draining",
            RunState::Paused => "paused",
            RunState::Done => "done",
            RunState::Unlocked => "unlocked",
        };
        f.write_str(s)
    }
}

/// How a run ended. Every variant is a normal exit (status 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Another run holds the lock; nothing was touched.
    LockBusy,
    /// Queue fully drained (or was empty).
    Done { completed: u64 },
    /// Retries for the head track were exhausted; it stays at the head.
    Paused { track: TrackRef, completed: u64 },
    /// Stopped by a signal; the last persisted queue is intact.
    Interrupted { completed: u64 },
}

impl RunOutcome {
    /// Tracks downloaded during this run.
    pub fn completed(&self) -> u64 {
        match self {
            RunOutcome::LockBusy => 0,
            RunOutcome::Done { completed }
            | RunOutcome::Paused { completed, .. }
            | RunOutcome::Interrupted { completed } => *completed,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::LockBusy => write!(f, "another instance is running; nothing to do"),
            RunOutcome::Done { completed } => {
                write!(f, "queue drained ({completed} track(s) downloaded this run)")
            }
            RunOutcome::Paused { track, completed } => write!(
                f,
                "paused after repeated failures on {track} ({completed} track(s) downloaded this run)"
            ),
            RunOutcome::Interrupted { completed } => write!(
                f,
                "interrupted ({completed} track(s) downloaded this run); progress saved"
            ),
        }
    }
}
