//! Per-attempt user-agent and proxy rotation.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::TrackqConfig;

/// Hints passed to the tool for one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchIdentity {
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
}

/// Immutable pools drawn from uniformly on every attempt.
#[derive(Debug, Clone, Default)]
pub struct Rotation {
    user_agents: Vec<String>,
    proxies: Vec<String>,
}

impl Rotation {
    pub fn new(user_agents: Vec<String>, proxies: Vec<String>) -> Self {
        let clean = |v: Vec<String>| -> Vec<String> {
            v.into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            user_agents: clean(user_agents),
            proxies: clean(proxies),
        }
    }

    pub fn from_config(cfg: &TrackqConfig) -> Self {
        Self::new(cfg.user_agents.clone(), cfg.proxies.clone())
    }

    /// Empty pools yield `None` (tool default user agent / direct connection).
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> FetchIdentity {
        FetchIdentity {
            user_agent: self.user_agents.choose(rng).cloned(),
            proxy: self.proxies.choose(rng).cloned(),
        }
    }
}
