use async_trait::async_trait;
use std::path::PathBuf;

use super::runner::{CommandInvocation, CommandOutput, CommandRunner, TokioCommandRunner};
use super::TranscriptFetcher;
use crate::transcript;
use crate::utils::{escape_output_template, sanitize_filename, subtitle_path, transcript_path};
use crate::TranscriptError;

/// Only English auto-generated captions are requested
pub const SUBTITLE_LANG: &str = "en";

/// YouTube caption downloader using yt-dlp.
///
/// Files are named after the sanitized video title and left in `work_dir`:
/// `<title>.en.vtt` from yt-dlp and `<title>.txt` with the cleaned text.
/// Two requests for videos with the same sanitized title share these paths.
pub struct YoutubeCaptionFetcher<R = TokioCommandRunner> {
    runner: R,
    yt_dlp_path: String,
    work_dir: PathBuf,
}

impl YoutubeCaptionFetcher {
    pub fn new(yt_dlp_path: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self::with_runner(TokioCommandRunner, yt_dlp_path, work_dir)
    }
}

impl<R: CommandRunner> YoutubeCaptionFetcher<R> {
    pub fn with_runner(runner: R, yt_dlp_path: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            yt_dlp_path: yt_dlp_path.into(),
            work_dir: work_dir.into(),
        }
    }

    async fn run(&self, invocation: CommandInvocation) -> Result<CommandOutput, TranscriptError> {
        self.runner.run(&invocation).await.map_err(|e| {
            TranscriptError::CommandFailed(format!("failed to run {}: {}", self.yt_dlp_path, e))
        })
    }

    /// Get the video title, sanitized for use as a file name
    pub async fn get_title(&self, url: &str) -> Result<String, TranscriptError> {
        tracing::debug!("Fetching video title for: {}", url);

        let output = self
            .run(CommandInvocation::new(&self.yt_dlp_path).args(["--get-title", "--no-playlist", url]))
            .await?;

        if !output.success() {
            tracing::warn!(
                "yt-dlp title lookup failed with {}: {}",
                output.status_description(),
                output.stderr.trim()
            );
            return Err(TranscriptError::TitleRetrievalFailed);
        }

        let title = sanitize_filename(output.stdout.trim());
        if title.is_empty() {
            return Err(TranscriptError::TitleRetrievalFailed);
        }

        Ok(title)
    }

    /// Download English auto-subtitles named after `title`, returning the `.vtt` path
    pub async fn download_subtitles(&self, url: &str, title: &str) -> Result<PathBuf, TranscriptError> {
        tracing::info!("Downloading auto-generated captions for \"{}\"", title);

        let invocation = CommandInvocation::new(&self.yt_dlp_path)
            .args(["--write-auto-sub", "--sub-lang", SUBTITLE_LANG, "--skip-download", "--no-playlist"])
            .arg("--output")
            .arg(escape_output_template(title))
            .arg(url)
            .current_dir(&self.work_dir);

        let output = self.run(invocation).await?;

        if !output.success() {
            return Err(TranscriptError::CommandFailed(format!(
                "{} exited with {}: {}",
                self.yt_dlp_path,
                output.status_description(),
                output.stderr.trim()
            )));
        }

        let vtt_path = subtitle_path(&self.work_dir, title, SUBTITLE_LANG);
        if !vtt_path.is_file() {
            tracing::warn!("Expected subtitle file is missing: {}", vtt_path.display());
            return Err(TranscriptError::TranscriptFileNotFound);
        }

        Ok(vtt_path)
    }

    /// Download captions for `url` and extract the cleaned transcript
    pub async fn download_transcript(&self, url: &str) -> Result<String, TranscriptError> {
        let title = self.get_title(url).await?;
        let vtt_path = self.download_subtitles(url, &title).await?;
        let txt_path = transcript_path(&self.work_dir, &title);

        // File reads and writes are blocking.
        tokio::task::spawn_blocking(move || transcript::extract_plain_text(&vtt_path, &txt_path))
            .await
            .map_err(|e| TranscriptError::Parse(format!("extraction task failed: {}", e)))?
    }
}

#[async_trait]
impl<R: CommandRunner> TranscriptFetcher for YoutubeCaptionFetcher<R> {
    async fn fetch_transcript(&self, url: &str) -> Result<String, TranscriptError> {
        self.download_transcript(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::runner::MockCommandRunner;

    const URL: &str = "https://www.youtube.com/watch?v=abc123";

    const CAPTIONS: &str = "WEBVTT
Kind: captions
Language: en

00:00:00.000 --> 00:00:01.500 align:start position:0%
welcome<00:00:00.400><c> back</c>

00:00:01.500 --> 00:00:01.510 align:start position:0%
welcome back

00:00:01.510 --> 00:00:03.000 align:start position:0%
welcome back
to<00:00:01.900><c> the</c><00:00:02.100><c> channel</c>
";

    fn output(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            status_code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    /// Mock yt-dlp: prints `title` and writes `captions` (if any) where yt-dlp would
    fn fake_yt_dlp(title: &'static str, captions: Option<&'static str>) -> MockCommandRunner {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(move |invocation| {
            if invocation.has_arg("--get-title") {
                return Ok(output(0, &format!("{}\n", title), ""));
            }

            let dir = invocation.current_dir.clone().expect("subtitle call sets a work dir");
            if let Some(captions) = captions {
                let name = sanitize_filename(title);
                std::fs::write(dir.join(format!("{}.en.vtt", name)), captions).unwrap();
            }
            Ok(output(0, "", ""))
        });
        runner
    }

    #[tokio::test]
    async fn test_download_transcript_success() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YoutubeCaptionFetcher::with_runner(
            fake_yt_dlp("Rust: Ownership?", Some(CAPTIONS)),
            "yt-dlp",
            dir.path(),
        );

        let text = fetcher.fetch_transcript(URL).await.unwrap();

        assert_eq!(text, "welcome back to the channel");
        let saved = fs_err::read_to_string(dir.path().join("Rust Ownership.txt")).unwrap();
        assert_eq!(saved, text);
        assert!(dir.path().join("Rust Ownership.en.vtt").exists());
    }

    #[tokio::test]
    async fn test_subtitle_invocation_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = dir.path().to_path_buf();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|invocation| {
                invocation.program == "/opt/bin/yt-dlp"
                    && invocation.args == ["--get-title", "--no-playlist", URL]
                    && invocation.current_dir.is_none()
            })
            .times(1)
            .returning(|_| Ok(output(0, "100% Legit\n", "")));
        runner
            .expect_run()
            .withf(move |invocation| {
                invocation.program == "/opt/bin/yt-dlp"
                    && invocation.args
                        == [
                            "--write-auto-sub",
                            "--sub-lang",
                            "en",
                            "--skip-download",
                            "--no-playlist",
                            "--output",
                            "100%% Legit",
                            URL,
                        ]
                    && invocation.current_dir.as_deref() == Some(work_dir.as_path())
            })
            .times(1)
            .returning(|_| Ok(output(0, "", "")));

        let fetcher = YoutubeCaptionFetcher::with_runner(runner, "/opt/bin/yt-dlp", dir.path());
        let err = fetcher.download_transcript(URL).await.unwrap_err();

        // The mock does not write a subtitle file.
        assert!(matches!(err, TranscriptError::TranscriptFileNotFound));
    }

    #[tokio::test]
    async fn test_title_lookup_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(output(1, "", "ERROR: Video unavailable")));

        let fetcher = YoutubeCaptionFetcher::with_runner(runner, "yt-dlp", dir.path());
        let err = fetcher.download_transcript(URL).await.unwrap_err();

        assert!(matches!(err, TranscriptError::TitleRetrievalFailed));
        assert_eq!(err.to_string(), "Failed to retrieve video title");
    }

    #[tokio::test]
    async fn test_title_of_only_invalid_chars() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YoutubeCaptionFetcher::with_runner(fake_yt_dlp("???", None), "yt-dlp", dir.path());

        let err = fetcher.get_title(URL).await.unwrap_err();
        assert!(matches!(err, TranscriptError::TitleRetrievalFailed));
    }

    #[tokio::test]
    async fn test_subtitle_download_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|invocation| {
            if invocation.has_arg("--get-title") {
                Ok(output(0, "Some Video\n", ""))
            } else {
                Ok(output(1, "", "ERROR: Unable to download webpage\n"))
            }
        });

        let fetcher = YoutubeCaptionFetcher::with_runner(runner, "yt-dlp", dir.path());
        let err = fetcher.download_transcript(URL).await.unwrap_err();

        assert!(matches!(err, TranscriptError::CommandFailed(_)));
        assert_eq!(
            err.to_string(),
            "Error: yt-dlp exited with exit status 1: ERROR: Unable to download webpage"
        );
    }

    #[tokio::test]
    async fn test_missing_subtitle_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YoutubeCaptionFetcher::with_runner(fake_yt_dlp("No Captions Here", None), "yt-dlp", dir.path());

        let err = fetcher.download_transcript(URL).await.unwrap_err();

        assert!(matches!(err, TranscriptError::TranscriptFileNotFound));
        assert_eq!(err.to_string(), "Transcript file not found");
        assert!(!dir.path().join("No Captions Here.txt").exists());
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"))
        });

        let fetcher = YoutubeCaptionFetcher::with_runner(runner, "yt-dlp", dir.path());
        let err = fetcher.download_transcript(URL).await.unwrap_err();

        assert_eq!(err.to_string(), "Error: failed to run yt-dlp: No such file or directory");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_extraction_runs_on_multi_thread_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = std::sync::Arc::new(YoutubeCaptionFetcher::with_runner(
            fake_yt_dlp("Threaded", Some(CAPTIONS)),
            "yt-dlp",
            dir.path(),
        ));

        let task = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.download_transcript(URL).await }
        });
        let text = task.await.unwrap().unwrap();

        assert_eq!(text, "welcome back to the channel");
        assert_eq!(fs_err::read_to_string(dir.path().join("Threaded.txt")).unwrap(), text);
    }

    #[tokio::test]
    async fn test_repeat_request_overwrites_transcript() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(dir.path().join("Same Title.txt"), "old transcript").unwrap();
        let fetcher =
            YoutubeCaptionFetcher::with_runner(fake_yt_dlp("Same Title", Some(CAPTIONS)), "yt-dlp", dir.path());

        let first = fetcher.download_transcript(URL).await.unwrap();
        let second = fetcher.download_transcript(URL).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fs_err::read_to_string(dir.path().join("Same Title.txt")).unwrap(), first);
    }
}
