//! `trackq song <url>` – one-shot download of a single track, no queue involved.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use trackq_core::config::TrackqConfig;
use trackq_core::control;
use trackq_core::fetcher::{Rotation, TrackFetcher, YtDlpFetcher};
use trackq_core::playlist::validate_url;
use trackq_core::track::TrackRef;

pub async fn run_song(cfg: &TrackqConfig, download_dir: &Path, url: &str) -> Result<()> {
    let url = validate_url(url)?;
    let track = TrackRef::new(url.as_str())?;

    std::fs::create_dir_all(download_dir)
        .with_context(|| format!("create download dir: {}", download_dir.display()))?;
    let fetcher = YtDlpFetcher::new(&cfg.tools, download_dir);
    let identity = Rotation::from_config(cfg).pick(&mut rand::rng());

    let cancel = CancellationToken::new();
    let _signals = control::spawn_signal_listener(cancel.clone());

    println!("Downloading {track} ...");
    tokio::select! {
        biased;
        _ = cancel.cancelled() => bail!("download of {track} interrupted"),
        r = fetcher.fetch(&track, &identity) => r.with_context(|| format!("download {track}"))?,
    }
    tracing::info!(track = %track, dir = %download_dir.display(), "single track downloaded");
    println!("Downloaded {track} into {}", download_dir.display());
    Ok(())
}
