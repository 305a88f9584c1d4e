use std::path::Path;

use crate::output;
use crate::TranscriptError;

pub mod processor;

pub use processor::LineCleaner;

/// Raw lines of a subtitle file, in file order
#[derive(Debug, Clone, Default)]
pub struct SubtitleDocument {
    lines: Vec<String>,
}

impl SubtitleDocument {
    /// Split subtitle text into lines, ignoring a leading byte-order mark.
    ///
    /// `\r\n`, `\n` and a bare `\r` all end a line.
    pub fn parse(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

        Self {
            lines: normalized.lines().map(str::to_string).collect(),
        }
    }

    /// Read a subtitle file from disk
    pub fn read(path: &Path) -> Result<Self, TranscriptError> {
        let content =
            fs_err::read_to_string(path).map_err(|e| TranscriptError::Parse(e.to_string()))?;

        Ok(Self::parse(&content))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Produce the cleaned, deduplicated transcript text
    pub fn to_plain_text(&self) -> String {
        clean_lines(&self.lines)
    }
}

/// Clean a sequence of subtitle lines into a single transcript paragraph.
///
/// Markup is stripped, timing and header lines are dropped, and every line is
/// kept only on its first occurrence. Accepted lines are joined by one space.
pub fn clean_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaner = LineCleaner::new();
    for line in lines {
        cleaner.push(line.as_ref());
    }
    cleaner.finish()
}

/// Extract plain text from a `.vtt` file and save it to `output_path`.
///
/// The output file is overwritten with the UTF-8 transcript, which is also
/// returned. Read and write failures are reported as [`TranscriptError::Parse`].
pub fn extract_plain_text(vtt_path: &Path, output_path: &Path) -> Result<String, TranscriptError> {
    tracing::debug!("Extracting plain text from {}", vtt_path.display());

    let document = SubtitleDocument::read(vtt_path)?;
    let text = document.to_plain_text();

    output::write_transcript(output_path, &text)
        .map_err(|e| TranscriptError::Parse(e.to_string()))?;

    tracing::info!(
        "Saved transcript ({} chars) to {}",
        text.chars().count(),
        output_path.display()
    );

    Ok(text)
}
