//! Humanized delay between successful downloads.
//!
//! Each call draws a fresh base delay, and depending on the index of the
//! completed track, a long break or an occasional mini-pause and bonus delay.
//! The only state carried between calls is the index, owned by the caller.

use rand::Rng;
use std::time::Duration;

use crate::config::PacingConfig;

/// Components of one pacing delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacingPlan {
    /// Base delay, or the long break when `long_break` is set.
    pub base: Duration,
    pub long_break: bool,
    pub mini_pause: Option<Duration>,
    pub bonus: Option<Duration>,
}

impl PacingPlan {
    pub fn total(&self) -> Duration {
        self.base + self.mini_pause.unwrap_or_default() + self.bonus.unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct PacingEngine {
    cfg: PacingConfig,
}

impl Default for PacingEngine {
    fn default() -> Self {
        Self::new(PacingConfig::default())
    }
}

impl PacingEngine {
    pub fn new(cfg: PacingConfig) -> Self {
        Self { cfg }
    }

    /// Plan the delay after the track with 0-based `index` (count of tracks
    /// completed earlier in this run).
    pub fn plan<R: Rng + ?Sized>(&self, index: u64, rng: &mut R) -> PacingPlan {
        let cfg = &self.cfg;
        if cfg.long_break_every > 0 && index > 0 && index % cfg.long_break_every == 0 {
            return PacingPlan {
                base: cfg.long_break_secs.sample(rng),
                long_break: true,
                mini_pause: None,
                bonus: None,
            };
        }

        let base = cfg.base_secs.sample(rng);

        let lo = cfg.mini_pause_modulus_min.max(1);
        let hi = cfg.mini_pause_modulus_max.max(lo);
        let modulus = rng.random_range(lo..=hi);
        let mini_pause =
            (index > 0 && index % modulus == 0).then(|| cfg.mini_pause_secs.sample(rng));

        let p = cfg.bonus_probability.clamp(0.0, 1.0);
        let bonus = rng.random_bool(p).then(|| cfg.bonus_secs.sample(rng));

        PacingPlan {
            base,
            long_break: false,
            mini_pause,
            bonus,
        }
    }

    pub fn delay_for<R: Rng + ?Sized>(&self, index: u64, rng: &mut R) -> Duration {
        self.plan(index, rng).total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SEEDS: u64 = 500;

    #[test]
    fn every_tenth_index_is_a_long_break() {
        let engine = PacingEngine::default();
        for seed in 0..SEEDS {
            let mut rng = StdRng::seed_from_u64(seed);
            for index in [10, 20, 30] {
                let plan = engine.plan(index, &mut rng);
                assert!(plan.long_break);
                assert!(plan.mini_pause.is_none() && plan.bonus.is_none());
                let secs = plan.total().as_secs_f64();
                assert!((240.0..360.0).contains(&secs), "index {index}: {secs}");
            }
        }
    }

    #[test]
    fn index_zero_never_takes_long_break_or_mini_pause() {
        let engine = PacingEngine::default();
        for seed in 0..SEEDS {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = engine.plan(0, &mut rng);
            assert!(!plan.long_break);
            assert!(plan.mini_pause.is_none());
        }
    }

    #[test]
    fn non_long_break_delay_has_base_floor() {
        let engine = PacingEngine::default();
        for seed in 0..SEEDS {
            let mut rng = StdRng::seed_from_u64(seed);
            for index in (0..40).filter(|i| i % 10 != 0 || *i == 0) {
                let plan = engine.plan(index, &mut rng);
                assert!(!plan.long_break);
                let base = plan.base.as_secs_f64();
                assert!((90.0..150.0).contains(&base), "base {base}");
                assert!(plan.total() >= Duration::from_secs(90));
                // base + mini (<90) + bonus (<120)
                assert!(plan.total() < Duration::from_secs(360));
            }
        }
    }

    #[test]
    fn mini_pause_only_on_possible_moduli() {
        let engine = PacingEngine::default();
        // 11 and 13 are not multiples of anything in 3..=7.
        for seed in 0..SEEDS {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(engine.plan(11, &mut rng).mini_pause.is_none());
            assert!(engine.plan(13, &mut rng).mini_pause.is_none());
        }
        // lcm(3..=7) = 420, a multiple of 10, so disable long breaks here.
        let engine = PacingEngine::new(PacingConfig {
            long_break_every: 0,
            ..PacingConfig::default()
        });
        for seed in 0..SEEDS {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = engine.plan(420, &mut rng);
            let mini = plan.mini_pause.expect("every modulus divides 420");
            assert!((30.0..90.0).contains(&mini.as_secs_f64()));
        }
    }

    #[test]
    fn bonus_follows_probability() {
        let certain = PacingEngine::new(PacingConfig {
            bonus_probability: 1.0,
            ..PacingConfig::default()
        });
        let never = PacingEngine::new(PacingConfig {
            bonus_probability: 0.0,
            ..PacingConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(42);
        for index in 1..9 {
            let bonus = certain.plan(index, &mut rng).bonus.expect("bonus");
            assert!((60.0..120.0).contains(&bonus.as_secs_f64()));
            assert!(never.plan(index, &mut rng).bonus.is_none());
        }

        // Default 5%: over many draws, roughly one in twenty.
        let engine = PacingEngine::default();
        let hits = (0..10_000)
            .filter(|_| engine.plan(1, &mut rng).bonus.is_some())
            .count();
        assert!((300..700).contains(&hits), "hits {hits}");
    }
}
