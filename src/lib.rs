//! yt-transcript - turn YouTube auto-generated captions into plain-text transcripts
//!
//! This library validates YouTube URLs, drives `yt-dlp` to download English
//! auto-subtitles, and cleans the resulting WebVTT file into a single
//! deduplicated line of text. The [`server`] module exposes it over HTTP.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod server;
pub mod transcript;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{video_id, TranscriptFetcher};
pub use transcript::{clean_lines, extract_plain_text};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types surfaced to callers of the transcript pipeline.
///
/// The `Display` text of each variant is the exact message returned to HTTP
/// clients in the `error` field.
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("YouTube URL is required")]
    MissingUrl,

    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Failed to retrieve video title")]
    TitleRetrievalFailed,

    #[error("Transcript file not found")]
    TranscriptFileNotFound,

    #[error("Error: {0}")]
    CommandFailed(String),

    #[error("Error parsing VTT file: {0}")]
    Parse(String),
}

impl TranscriptError {
    /// Whether the error was caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TranscriptError::MissingUrl | TranscriptError::InvalidUrl)
    }
}
