//! CLI for the trackq download queue.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trackq_core::config::{self, TrackqConfig};
use trackq_core::paths::StatePaths;

use commands::{run_clear, run_queue, run_song, run_status, run_unlock};

/// Top-level CLI for trackq.
#[derive(Debug, Parser)]
#[command(name = "trackq")]
#[command(about = "trackq: persistent, paced playlist download queue", long_about = None)]
pub struct Cli {
    /// Write log lines to stderr instead of the log file.
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Drain the pending queue; with --playlist, replace it with the playlist's tracks first.
    Run {
        /// Playlist URL whose tracks seed the queue.
        #[arg(long, value_name = "URL")]
        playlist: Option<String>,
        /// Directory for downloaded audio (default: config download_dir, else current directory).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Download a single track now, without touching the queue.
    Song {
        /// HTTP/HTTPS URL of the track.
        url: String,
        /// Directory for downloaded audio (default: config download_dir, else current directory).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Show the lock state and pending tracks.
    Status,

    /// Delete the pending queue (refused while a run holds the lock).
    Clear,

    /// Remove a stale lock left behind by a killed run.
    Unlock,
}

/// `--output-dir`, else config `download_dir`, else the current directory.
fn resolve_download_dir(cfg: &TrackqConfig, flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag.or_else(|| cfg.download_dir.clone()) {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let paths = StatePaths::resolve(&cfg)?;

        match self.command {
            CliCommand::Run {
                playlist,
                output_dir,
            } => {
                let download_dir = resolve_download_dir(&cfg, output_dir)?;
                run_queue(&cfg, paths, &download_dir, playlist.as_deref()).await?;
            }
            CliCommand::Song { url, output_dir } => {
                let download_dir = resolve_download_dir(&cfg, output_dir)?;
                run_song(&cfg, &download_dir, &url).await?;
            }
            CliCommand::Status => run_status(&paths)?,
            CliCommand::Clear => run_clear(&paths)?,
            CliCommand::Unlock => run_unlock(&paths)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
