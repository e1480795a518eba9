use anyhow::{bail, Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Inclusive-exclusive range of seconds, sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondsRange {
    pub min: f64,
    pub max: f64,
}

impl SecondsRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a duration in `[min, max)`. A degenerate range yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min.max(0.0);
        let secs = if self.max > min {
            rng.random_range(min..self.max)
        } else {
            min
        };
        Duration::from_secs_f64(secs)
    }

    /// Reject bounds that cannot be sampled: non-finite, negative, or inverted.
    pub fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            bail!("{name}: bounds must be finite (got {} .. {})", self.min, self.max);
        }
        if self.min < 0.0 || self.max < self.min {
            bail!("{name}: need 0 <= min <= max (got {} .. {})", self.min, self.max);
        }
        Ok(())
    }
}

/// Retry policy parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of fetch attempts per track (including the first).
    pub max_attempts: u32,
    /// Pause after retries are exhausted, before the run exits.
    pub pause_after_exhaustion_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            pause_after_exhaustion_secs: 3,
        }
    }
}

/// Humanized pacing between successful downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    pub base_secs: SecondsRange,
    /// Every Nth completed track (N > 0) takes a long break instead.
    pub long_break_every: u64,
    pub long_break_secs: SecondsRange,
    /// Lower/upper bound (inclusive) of the per-call mini-pause modulus.
    pub mini_pause_modulus_min: u64,
    pub mini_pause_modulus_max: u64,
    pub mini_pause_secs: SecondsRange,
    pub bonus_probability: f64,
    pub bonus_secs: SecondsRange,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_secs: SecondsRange::new(90.0, 150.0),
            long_break_every: 10,
            long_break_secs: SecondsRange::new(240.0, 360.0),
            mini_pause_modulus_min: 3,
            mini_pause_modulus_max: 7,
            mini_pause_secs: SecondsRange::new(30.0, 90.0),
            bonus_probability: 0.05,
            bonus_secs: SecondsRange::new(60.0, 120.0),
        }
    }
}

impl PacingConfig {
    pub fn validate(&self) -> Result<()> {
        self.base_secs.validate("pacing.base_secs")?;
        self.long_break_secs.validate("pacing.long_break_secs")?;
        self.mini_pause_secs.validate("pacing.mini_pause_secs")?;
        self.bonus_secs.validate("pacing.bonus_secs")?;
        if !(0.0..=1.0).contains(&self.bonus_probability) {
            bail!(
                "pacing.bonus_probability must be within [0, 1] (got {})",
                self.bonus_probability
            );
        }
        Ok(())
    }
}

/// External tool locations and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// yt-dlp executable (name on PATH or absolute path).
    pub ytdlp_path: String,
    /// ffmpeg location passed to yt-dlp; None lets yt-dlp find it.
    #[serde(default)]
    pub ffmpeg_path: Option<String>,
    pub audio_format: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            ffmpeg_path: None,
            audio_format: "mp3".to_string(),
        }
    }
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:89.0)",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_shuffle() -> bool {
    true
}

/// Global configuration loaded from `~/.config/trackq/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackqConfig {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Where audio files land (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Where the queue and lock files live (None = XDG state dir).
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// User agents rotated per attempt (empty = tool default).
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
    /// Proxies rotated per attempt (empty = no proxy).
    #[serde(default)]
    pub proxies: Vec<String>,
    /// Shuffle playlist entries before seeding the queue.
    #[serde(default = "default_shuffle")]
    pub shuffle_playlist: bool,
}

impl Default for TrackqConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            pacing: PacingConfig::default(),
            tools: ToolsConfig::default(),
            download_dir: None,
            state_dir: None,
            user_agents: default_user_agents(),
            proxies: Vec::new(),
            shuffle_playlist: true,
        }
    }
}

impl TrackqConfig {
    /// Checks values that would otherwise fail mid-run.
    pub fn validate(&self) -> Result<()> {
        self.pacing.validate()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("trackq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TrackqConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TrackqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TrackqConfig = toml::from_str(&data)?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_config_values() {
        let cfg = TrackqConfig::default();
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.pause_after_exhaustion_secs, 3);
        assert_eq!(cfg.pacing.long_break_every, 10);
        assert_eq!(cfg.user_agents.len(), 3);
        assert!(cfg.proxies.is_empty());
        assert!(cfg.shuffle_playlist);
        assert_eq!(cfg.tools.ytdlp_path, "yt-dlp");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TrackqConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TrackqConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.retry.max_attempts, cfg.retry.max_attempts);
        assert_eq!(parsed.pacing.base_secs, cfg.pacing.base_secs);
        assert_eq!(parsed.user_agents, cfg.user_agents);
        assert_eq!(parsed.tools.audio_format, cfg.tools.audio_format);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: TrackqConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.user_agents.len(), 3);
        assert!(cfg.shuffle_playlist);
        assert!(cfg.download_dir.is_none());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            proxies = ["10.0.0.1:8080", "10.0.0.2:8080"]
            user_agents = []
            shuffle_playlist = false
            download_dir = "/srv/music"

            [retry]
            max_attempts = 3
            pause_after_exhaustion_secs = 10

            [tools]
            ytdlp_path = "/opt/bin/yt-dlp"
            ffmpeg_path = "/opt/bin/ffmpeg"
            audio_format = "opus"
        "#;
        let cfg: TrackqConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.proxies.len(), 2);
        assert!(cfg.user_agents.is_empty());
        assert!(!cfg.shuffle_playlist);
        assert_eq!(cfg.download_dir, Some(PathBuf::from("/srv/music")));
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.pause_after_exhaustion_secs, 10);
        assert_eq!(cfg.tools.ffmpeg_path.as_deref(), Some("/opt/bin/ffmpeg"));
        assert_eq!(cfg.tools.audio_format, "opus");
        // Untouched section keeps defaults.
        assert_eq!(cfg.pacing.long_break_every, 10);
    }

    #[test]
    fn seconds_range_sample_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = SecondsRange::new(1.0, 3.0);
        for _ in 0..1000 {
            let d = r.sample(&mut rng).as_secs_f64();
            assert!((1.0..3.0).contains(&d), "{d}");
        }
        let degenerate = SecondsRange::new(5.0, 5.0);
        assert_eq!(degenerate.sample(&mut rng), Duration::from_secs(5));
    }

    #[test]
    fn default_config_is_valid() {
        TrackqConfig::default().validate().unwrap();
    }

    #[test]
    fn non_finite_pacing_values_are_rejected() {
        let nan_bonus: TrackqConfig = toml::from_str(
            r#"
            [pacing]
            base_secs = { min = 90.0, max = 150.0 }
            long_break_every = 10
            long_break_secs = { min = 240.0, max = 360.0 }
            mini_pause_modulus_min = 3
            mini_pause_modulus_max = 7
            mini_pause_secs = { min = 30.0, max = 90.0 }
            bonus_probability = nan
            bonus_secs = { min = 60.0, max = 120.0 }
            "#,
        )
        .unwrap();
        let err = nan_bonus.validate().unwrap_err();
        assert!(err.to_string().contains("bonus_probability"), "{err}");

        let mut cfg = TrackqConfig::default();
        cfg.pacing.base_secs = SecondsRange::new(90.0, f64::INFINITY);
        assert!(cfg.validate().is_err());
        cfg.pacing.base_secs = SecondsRange::new(f64::NAN, 150.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn out_of_range_pacing_values_are_rejected() {
        let mut cfg = TrackqConfig::default();
        cfg.pacing.bonus_probability = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = TrackqConfig::default();
        cfg.pacing.long_break_secs = SecondsRange::new(360.0, 240.0);
        assert!(cfg.validate().is_err());

        let mut cfg = TrackqConfig::default();
        cfg.pacing.mini_pause_secs = SecondsRange::new(-5.0, 10.0);
        assert!(cfg.validate().is_err());
    }
}
