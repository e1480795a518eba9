//! Shared helpers for run controller tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use trackq_core::fetcher::{FetchError, FetchIdentity, TrackFetcher};
use trackq_core::queue::{Queue, QueueStore};
use trackq_core::track::TrackRef;

type Script = Box<dyn Fn(&str, usize) -> Result<(), FetchError>>;

/// Fake fetcher: records every call and answers from a script taking
/// `(track, 0-based call number)`.
pub struct ScriptedFetcher {
    calls: Mutex<Vec<String>>,
    script: Script,
}

impl ScriptedFetcher {
    pub fn new(script: impl Fn(&str, usize) -> Result<(), FetchError> + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Box::new(script),
        }
    }

    pub fn always_ok() -> Self {
        Self::new(|_, _| Ok(()))
    }

    pub fn always_fail() -> Self {
        Self::new(|_, _| Err(failure()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl TrackFetcher for ScriptedFetcher {
    async fn fetch(&self, track: &TrackRef, _: &FetchIdentity) -> Result<(), FetchError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(track.to_string());
            calls.len() - 1
        };
        (self.script)(track.as_str(), n)
    }
}

/// The tool's normal failure signal (nonzero exit).
#[cfg(unix)]
pub fn failure() -> FetchError {
    use std::os::unix::process::ExitStatusExt;
    FetchError::Failed {
        status: std::process::ExitStatus::from_raw(1 << 8),
        diagnostic: "ERROR: HTTP Error 429: Too Many Requests".to_string(),
    }
}

#[cfg(not(unix))]
pub fn failure() -> FetchError {
    FetchError::Unexpected("HTTP Error 429: Too Many Requests".to_string())
}

pub fn queue(items: &[&str]) -> Queue {
    items.iter().map(|s| TrackRef::new(*s).unwrap()).collect()
}

pub fn tracks(items: &[&str]) -> Vec<TrackRef> {
    items.iter().map(|s| TrackRef::new(*s).unwrap()).collect()
}

/// Queue contents as stored on disk.
pub fn stored(path: &Path) -> Vec<String> {
    QueueStore::new(path)
        .load()
        .iter()
        .map(|t| t.to_string())
        .collect()
}
