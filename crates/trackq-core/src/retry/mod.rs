//! Retry and backoff around a single-track fetch.
//!
//! A bounded loop (no recursion) holds the 1-based attempt counter. The
//! counter lives only for one call; a restarted process starts again at 1.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryOutcome};
