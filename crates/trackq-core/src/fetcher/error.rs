//! Fetch failure classes.

use std::process::ExitStatus;

/// Error returned by a single fetch attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The tool ran and reported failure (nonzero exit).
    #[error("download failed ({status}): {diagnostic}")]
    Failed {
        status: ExitStatus,
        diagnostic: String,
    },
    /// The tool could not be started or waited on.
    #[error("could not run downloader: {0}")]
    Spawn(#[source] std::io::Error),
    /// Anything else.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl FetchError {
    /// Unexpected errors are retried like normal failures but logged louder.
    pub fn is_unexpected(&self) -> bool {
        !matches!(self, FetchError::Failed { .. })
    }
}
