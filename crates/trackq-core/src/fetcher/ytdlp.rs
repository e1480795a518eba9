//! yt-dlp backed fetcher: extract audio for one URL into the download dir.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::config::ToolsConfig;
use crate::track::TrackRef;

use super::{FetchError, FetchIdentity, TrackFetcher};

/// Output template: file named after the track's title.
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Keep the tail of stderr; yt-dlp prints the actual error last.
const DIAGNOSTIC_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    ytdlp_path: String,
    ffmpeg_path: Option<String>,
    audio_format: String,
    output_dir: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(tools: &ToolsConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: tools.ytdlp_path.clone(),
            ffmpeg_path: tools.ffmpeg_path.clone(),
            audio_format: tools.audio_format.clone(),
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Arguments for one attempt (without the program name). The track goes
    /// last, after `--`, so a reference starting with `-` is never an option.
    pub fn args(&self, track: &TrackRef, identity: &FetchIdentity) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-x".into(),
            "--audio-format".into(),
            self.audio_format.as_str().into(),
        ];
        if let Some(ffmpeg) = &self.ffmpeg_path {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.into());
        }
        if let Some(ua) = &identity.user_agent {
            args.push("--user-agent".into());
            args.push(ua.into());
        }
        if let Some(proxy) = &identity.proxy {
            args.push("--proxy".into());
            args.push(proxy.into());
        }
        args.push("-o".into());
        args.push(self.output_dir.join(OUTPUT_TEMPLATE).into_os_string());
        args.push("--".into());
        args.push(track.as_str().into());
        args
    }
}

fn diagnostic_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let count = text.chars().count();
    if count <= DIAGNOSTIC_MAX_CHARS {
        return text.to_string();
    }
    text.chars().skip(count - DIAGNOSTIC_MAX_CHARS).collect()
}

impl TrackFetcher for YtDlpFetcher {
    async fn fetch(&self, track: &TrackRef, identity: &FetchIdentity) -> Result<(), FetchError> {
        tracing::debug!(
            track = %track,
            user_agent = identity.user_agent.as_deref().unwrap_or("-"),
            proxy = identity.proxy.as_deref().unwrap_or("-"),
            "spawning {}",
            self.ytdlp_path
        );
        // kill_on_drop: a cancelled run must not leave the download running.
        let output = Command::new(&self.ytdlp_path)
            .args(self.args(track, identity))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(FetchError::Spawn)?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FetchError::Failed {
                status: output.status,
                diagnostic: diagnostic_tail(&output.stderr),
            })
        }
    }
}
