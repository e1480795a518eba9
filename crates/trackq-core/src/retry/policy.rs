use rand::Rng;
use std::time::Duration;

use crate::config::{RetryConfig, SecondsRange};

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryDecision {
    /// Attempts exhausted.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with jitter: `2^attempt + uniform[1, 3)` seconds.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub jitter: SecondsRange,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            jitter: SecondsRange::new(1.0, 3.0),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Deterministic part of the delay after failed attempt `attempt` (1-based).
    pub fn base_delay(attempt: u32) -> Duration {
        Duration::from_secs(1u64 << attempt.min(16))
    }

    /// Decide what to do after attempt `attempt` (1-based) failed.
    pub fn decide<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(Self::base_delay(attempt) + self.jitter.sample(rng))
    }
}
