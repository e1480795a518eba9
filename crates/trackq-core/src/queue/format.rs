//! On-disk queue format: UTF-8, one track reference per line, `\n`-terminated.
//!
//! Any malformed row makes the whole file undecodable; callers treat that the
//! same as an unreadable file (queue lost).

use crate::track::{TrackRef, TrackRefError};

use super::Queue;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("queue file is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("malformed row {row}: {source}")]
    BadRow {
        row: usize,
        #[source]
        source: TrackRefError,
    },
}

/// Serialize a queue, head first.
pub fn encode(queue: &Queue) -> String {
    let mut out = String::new();
    for track in queue.iter() {
        out.push_str(track.as_str());
        out.push('\n');
    }
    out
}

/// Parse a queue file. A final row without a trailing newline is accepted.
pub fn decode(bytes: &[u8]) -> Result<Queue, FormatError> {
    let text = std::str::from_utf8(bytes)?;
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            TrackRef::new(line).map_err(|source| FormatError::BadRow { row: i + 1, source })
        })
        .collect()
}
