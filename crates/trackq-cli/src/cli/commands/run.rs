//! `trackq run` – drain the pending queue, optionally seeding it from a playlist.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use trackq_core::config::TrackqConfig;
use trackq_core::control;
use trackq_core::fetcher::YtDlpFetcher;
use trackq_core::paths::StatePaths;
use trackq_core::playlist::{self, YtDlpPlaylist};
use trackq_core::runner::Runner;

pub async fn run_queue(
    cfg: &TrackqConfig,
    paths: StatePaths,
    download_dir: &Path,
    playlist_url: Option<&str>,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let _signals = control::spawn_signal_listener(cancel.clone());
    let mut rng = StdRng::from_os_rng();

    let seed = match playlist_url {
        Some(url) => {
            let extractor = YtDlpPlaylist::new(&cfg.tools);
            let tracks = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    println!("Interrupted during playlist extraction; queue untouched.");
                    return Ok(());
                }
                r = playlist::build_seed(&extractor, url, cfg.shuffle_playlist, &mut rng) => r?,
            };
            println!("Extracted {} track(s) from playlist.", tracks.len());
            Some(tracks)
        }
        None => None,
    };

    std::fs::create_dir_all(download_dir)
        .with_context(|| format!("create download dir: {}", download_dir.display()))?;
    let fetcher = YtDlpFetcher::new(&cfg.tools, download_dir);
    tracing::info!(dir = %download_dir.display(), "downloading into");

    let mut runner = Runner::new(paths, cfg, fetcher, rng, cancel);
    let outcome = runner.run(seed).await?;
    println!("{outcome}");
    Ok(())
}
