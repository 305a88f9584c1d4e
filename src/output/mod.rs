use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::cli::OutputFormat;

/// JSON shape used by `--format json`, mirroring the HTTP success body
#[derive(Debug, Serialize)]
struct TranscriptDocument<'a> {
    source: &'a str,
    transcript: &'a str,
}

/// Write transcript text as UTF-8, replacing any existing file
pub fn write_transcript(path: &Path, text: &str) -> std::io::Result<()> {
    fs_err::write(path, text.as_bytes())
}

/// Render a transcript in the requested output format
pub fn format_transcript(source: &str, text: &str, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => text.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&TranscriptDocument {
            source,
            transcript: text,
        })?,
    };

    Ok(content)
}

/// Save a formatted transcript to file
pub fn save_to_file(source: &str, text: &str, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = format_transcript(source, text, format)?;
    write_transcript(path, &content)?;
    Ok(())
}

/// Print a formatted transcript to console
pub fn print_to_console(source: &str, text: &str, format: &OutputFormat) -> Result<()> {
    let content = format_transcript(source, text, format)?;
    println!("{}", content);
    Ok(())
}
