//! Retry loop: fetch until success, exhaustion, or cancellation.

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::control::sleep_or_cancel;
use crate::fetcher::{Rotation, TrackFetcher};
use crate::track::TrackRef;

use super::policy::{RetryDecision, RetryPolicy};

/// How a retried fetch ended. Exhaustion is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    Succeeded { attempts: u32 },
    Exhausted { attempts: u32 },
    /// Cancelled during a fetch or a backoff sleep.
    Cancelled { attempts: u32 },
}

/// Drive `fetcher` for `track` under `policy`. Each attempt draws a fresh
/// identity from `rotation`; failures sleep for the backoff delay.
pub async fn run_with_retry<F, R>(
    policy: &RetryPolicy,
    fetcher: &F,
    rotation: &Rotation,
    track: &TrackRef,
    rng: &mut R,
    cancel: &CancellationToken,
) -> RetryOutcome
where
    F: TrackFetcher + ?Sized,
    R: Rng + ?Sized,
{
    let mut attempt = 1u32;
    loop {
        if cancel.is_cancelled() {
            return RetryOutcome::Cancelled {
                attempts: attempt - 1,
            };
        }
        let identity = rotation.pick(rng);
        tracing::info!(track = %track, attempt, "downloading");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!(track = %track, attempt, "download interrupted");
                return RetryOutcome::Cancelled { attempts: attempt };
            }
            r = fetcher.fetch(track, &identity) => r,
        };

        let err = match result {
            Ok(()) => {
                tracing::info!(track = %track, attempt, "downloaded");
                return RetryOutcome::Succeeded { attempts: attempt };
            }
            Err(e) => e,
        };

        if err.is_unexpected() {
            tracing::error!(track = %track, attempt, "unexpected fetch error: {}", err);
        } else {
            tracing::warn!(track = %track, attempt, "fetch failed: {}", err);
        }

        match policy.decide(attempt, rng) {
            RetryDecision::NoRetry => {
                tracing::warn!(track = %track, attempts = attempt, "max retries exceeded");
                return RetryOutcome::Exhausted { attempts: attempt };
            }
            RetryDecision::RetryAfter(d) => {
                tracing::info!(
                    track = %track,
                    attempt,
                    delay_secs = %format!("{:.1}", d.as_secs_f64()),
                    "retrying after backoff"
                );
                if !sleep_or_cancel(d, cancel).await {
                    tracing::warn!(track = %track, attempt, "backoff interrupted");
                    return RetryOutcome::Cancelled { attempts: attempt };
                }
                attempt += 1;
            }
        }
    }
}
