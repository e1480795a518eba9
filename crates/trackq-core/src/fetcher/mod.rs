//! Track fetcher: the external download/transcode tool behind a trait.
//!
//! The core never looks inside a download. A fetch either succeeds or fails
//! with a diagnostic; [`FetchError::is_unexpected`] separates the tool's
//! normal failure signal (nonzero exit) from everything else.

mod error;
mod identity;
mod ytdlp;

use std::future::Future;

use crate::track::TrackRef;

pub use error::FetchError;
pub use identity::{FetchIdentity, Rotation};
pub use ytdlp::YtDlpFetcher;

/// One download attempt for one track.
pub trait TrackFetcher {
    fn fetch(
        &self,
        track: &TrackRef,
        identity: &FetchIdentity,
    ) -> impl Future<Output = Result<(), FetchError>>;
}

impl<T: TrackFetcher + ?Sized> TrackFetcher for &T {
    fn fetch(
        &self,
        track: &TrackRef,
        identity: &FetchIdentity,
    ) -> impl Future<Output = Result<(), FetchError>> {
        (**self).fetch(track, identity)
    }
}
