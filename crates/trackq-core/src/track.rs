//! Track references: the opaque identifiers (usually URLs) held in the queue.

use std::fmt;

/// Reason a string cannot be used as a track reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackRefError {
    #[error("track reference is empty")]
    Empty,
    /// The queue file stores one reference per line.
    #[error("track reference contains a line break: {0:?}")]
    LineBreak(String),
}

/// One downloadable item. Immutable once created; the content is never
/// inspected beyond being a nonempty single-line string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRef(String);

impl TrackRef {
    pub fn new(value: impl Into<String>) -> Result<Self, TrackRefError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TrackRefError::Empty);
        }
        if value.contains(['\n', '\r']) {
            return Err(TrackRefError::LineBreak(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrackRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for TrackRef {
    type Error = TrackRefError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
