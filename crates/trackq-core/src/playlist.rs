//! Playlist extraction: turn a playlist URL into track references for seeding
//! the queue. Extraction itself is delegated to yt-dlp's flat-playlist JSON.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::future::Future;
use std::process::Stdio;
use tokio::process::Command;
use url::Url;

use crate::config::ToolsConfig;
use crate::track::TrackRef;

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("playlist has no downloadable tracks")]
    Empty,
    #[error("could not run extractor: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("extractor failed: {0}")]
    Extractor(String),
    #[error("unreadable extractor output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Require an absolute `http`/`https` URL with a host.
pub fn validate_url(input: &str) -> Result<Url, PlaylistError> {
    let invalid = |reason: &str| PlaylistError::InvalidUrl {
        url: input.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(input.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

/// Source of playlist member track references, in playlist order.
pub trait PlaylistExtractor {
    fn extract(&self, url: &Url) -> impl Future<Output = Result<Vec<TrackRef>, PlaylistError>>;
}

#[derive(Debug, Deserialize)]
struct FlatPlaylist {
    #[serde(default)]
    entries: Vec<Option<FlatEntry>>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    url: Option<String>,
    webpage_url: Option<String>,
    id: Option<String>,
}

/// Parse `yt-dlp --flat-playlist -J` output. Unavailable entries (null or
/// without any usable reference) are skipped.
pub fn parse_flat_playlist(json: &[u8]) -> Result<Vec<TrackRef>, PlaylistError> {
    let playlist: FlatPlaylist = serde_json::from_slice(json)?;
    let tracks = playlist
        .entries
        .into_iter()
        .flatten()
        .filter_map(|e| {
            [e.url, e.webpage_url, e.id]
                .into_iter()
                .flatten()
                .find_map(|s| TrackRef::new(s).ok())
        })
        .collect();
    Ok(tracks)
}

#[derive(Debug, Clone)]
pub struct YtDlpPlaylist {
    ytdlp_path: String,
}

impl YtDlpPlaylist {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            ytdlp_path: tools.ytdlp_path.clone(),
        }
    }
}

impl PlaylistExtractor for YtDlpPlaylist {
    async fn extract(&self, url: &Url) -> Result<Vec<TrackRef>, PlaylistError> {
        tracing::info!(url = %url, "extracting playlist");
        let output = Command::new(&self.ytdlp_path)
            .args(["--flat-playlist", "-J", "--", url.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(PlaylistError::Spawn)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PlaylistError::Extractor(format!("{}: {}", output.status, stderr)));
        }
        parse_flat_playlist(&output.stdout)
    }
}

/// Validate `input`, extract its tracks, and optionally shuffle them.
/// An empty result is an error: there is nothing to seed.
pub async fn build_seed<E, R>(
    extractor: &E,
    input: &str,
    shuffle: bool,
    rng: &mut R,
) -> Result<Vec<TrackRef>, PlaylistError>
where
    E: PlaylistExtractor + ?Sized,
    R: Rng + ?Sized,
{
    let url = validate_url(input)?;
    let mut tracks = extractor.extract(&url).await?;
    if tracks.is_empty() {
        return Err(PlaylistError::Empty);
    }
    if shuffle {
        tracks.shuffle(rng);
    }
    tracing::info!(url = %url, tracks = tracks.len(), shuffle, "playlist extracted");
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixed(Vec<&'static str>);

    impl PlaylistExtractor for Fixed {
        async fn extract(&self, _: &Url) -> Result<Vec<TrackRef>, PlaylistError> {
            Ok(self.0.iter().map(|s| TrackRef::new(*s).unwrap()).collect())
        }
    }

    #[test]
    fn validate_url_accepts_http_and_https() {
        assert!(validate_url("https://www.youtube.com/playlist?list=PL123").is_ok());
        assert!(validate_url("http://example.com/p").is_ok());
    }

    #[test]
    fn validate_url_rejects_garbage() {
        for bad in ["", "not a url", "ftp://example.com/x", "file:///etc/passwd", "PL123"] {
            assert!(
                matches!(validate_url(bad), Err(PlaylistError::InvalidUrl { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn parse_flat_playlist_prefers_url_and_skips_unavailable() {
        let json = br#"{
            "_type": "playlist",
            "title": "Mix",
            "entries": [
                {"id": "a1", "url": "https://www.youtube.com/watch?v=a1"},
                null,
                {"id": "b2", "url": null, "webpage_url": "https://www.youtube.com/watch?v=b2"},
                {"id": "c3"},
                {"title": "deleted video"}
            ]
        }"#;
        let tracks = parse_flat_playlist(json).unwrap();
        let refs: Vec<&str> = tracks.iter().map(TrackRef::as_str).collect();
        assert_eq!(
            refs,
            [
                "https://www.youtube.com/watch?v=a1",
                "https://www.youtube.com/watch?v=b2",
                "c3"
            ]
        );
    }

    #[test]
    fn parse_flat_playlist_without_entries_is_empty() {
        assert!(parse_flat_playlist(br#"{"_type": "video"}"#).unwrap().is_empty());
        assert!(matches!(
            parse_flat_playlist(b"ERROR"),
            Err(PlaylistError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn build_seed_keeps_order_without_shuffle() {
        let mut rng = StdRng::seed_from_u64(0);
        let seed = build_seed(&Fixed(vec!["a", "b", "c"]), "https://x.test/p", false, &mut rng)
            .await
            .unwrap();
        let refs: Vec<&str> = seed.iter().map(TrackRef::as_str).collect();
        assert_eq!(refs, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn build_seed_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        let items: Vec<&'static str> = vec!["1", "2", "3", "4", "5", "6", "7", "8"];
        let seed = build_seed(&Fixed(items.clone()), "https://x.test/p", true, &mut rng)
            .await
            .unwrap();
        let mut refs: Vec<&str> = seed.iter().map(TrackRef::as_str).collect();
        refs.sort_unstable();
        assert_eq!(refs, items);
    }

    #[tokio::test]
    async fn build_seed_rejects_empty_and_invalid() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            build_seed(&Fixed(vec![]), "https://x.test/p", true, &mut rng).await,
            Err(PlaylistError::Empty)
        ));
        assert!(matches!(
            build_seed(&Fixed(vec!["a"]), "nope", true, &mut rng).await,
            Err(PlaylistError::InvalidUrl { .. })
        ));
    }
}
