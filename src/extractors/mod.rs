use async_trait::async_trait;
use url::Url;

pub mod runner;
pub mod youtube;

pub use runner::{CommandInvocation, CommandOutput, CommandRunner, TokioCommandRunner};
pub use youtube::YoutubeCaptionFetcher;

use crate::TranscriptError;

/// Hosts whose video id is carried in the `v` query parameter
pub const WATCH_HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];

/// Short-link host whose video id is the first path segment
pub const SHORT_HOST: &str = "youtu.be";

/// Trait for turning a video URL into a cleaned transcript
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Download captions for `url` and return the cleaned transcript text
    async fn fetch_transcript(&self, url: &str) -> Result<String, TranscriptError>;
}

/// Extract the video identifier from a YouTube URL.
///
/// Returns `None` when the URL cannot be parsed, the host is not a known
/// YouTube host, or the identifier is missing.
pub fn video_id(url: &str) -> Option<String> {
    let parsed = validate_url(url).ok()?;
    let host = parsed.host_str()?;

    if WATCH_HOSTS.contains(&host) {
        parsed
            .query_pairs()
            .find(|(key, value)| key == "v" && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    } else if host == SHORT_HOST {
        parsed
            .path_segments()?
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    } else {
        None
    }
}

/// Validate a request URL, returning its video id or the matching client error
pub fn require_video_id(url: Option<&str>) -> Result<String, TranscriptError> {
    let url = url
        .filter(|url| !url.is_empty())
        .ok_or(TranscriptError::MissingUrl)?;

    video_id(url).ok_or(TranscriptError::InvalidUrl)
}

/// Validate and normalize URLs
pub fn validate_url(url: &str) -> crate::Result<Url> {
    let parsed = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed)
}
