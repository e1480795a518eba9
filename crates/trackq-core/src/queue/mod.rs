//! Pending download queue and its durable store.
//!
//! The queue is an ordered list of [`TrackRef`]s: head = next to process,
//! insertion order = processing order. Its on-disk form is a plain text file
//! with one reference per line. An empty queue has no file at all; absence of
//! the file *is* the empty state.
//!
//! The store does not serialize writers. Only the holder of the
//! [`InstanceLock`](crate::instance_lock::InstanceLock) may call
//! [`QueueStore::save`].

mod format;
mod store;

use std::collections::VecDeque;

use crate::track::TrackRef;

pub use format::{decode, encode, FormatError};
pub use store::QueueStore;

/// In-memory queue of pending tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queue {
    tracks: VecDeque<TrackRef>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next track to process, if any.
    pub fn head(&self) -> Option<&TrackRef> {
        self.tracks.front()
    }

    /// Remove and return the head. Called only after the head was downloaded.
    pub fn pop_head(&mut self) -> Option<TrackRef> {
        self.tracks.pop_front()
    }

    pub fn push(&mut self, track: TrackRef) {
        self.tracks.push_back(track);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackRef> {
        self.tracks.iter()
    }
}

impl FromIterator<TrackRef> for Queue {
    fn from_iter<I: IntoIterator<Item = TrackRef>>(iter: I) -> Self {
        Self {
            tracks: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<TrackRef>> for Queue {
    fn from(tracks: Vec<TrackRef>) -> Self {
        Self {
            tracks: tracks.into(),
        }
    }
}
