use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Inline cue markup such as `<c>`, `</c>` or karaoke timestamps `<00:00:01.520>`
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Marker separating start and end of a cue timing line
pub const TIMING_MARKER: &str = "-->";

/// Prefixes of the WebVTT header and the metadata lines yt-dlp writes below it
pub const HEADER_PREFIXES: [&str; 3] = ["WEBVTT", "Kind:", "Language:"];

/// Remove inline markup from a line and trim surrounding whitespace
pub fn strip_markup(line: &str) -> String {
    MARKUP_REGEX.replace_all(line, "").trim().to_string()
}

/// Check whether an already stripped line is a timing or header line
pub fn is_metadata(line: &str) -> bool {
    line.contains(TIMING_MARKER) || HEADER_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// Accumulates caption text lines, dropping metadata and exact repeats.
///
/// Auto-generated captions repeat each line across overlapping cue windows,
/// so a line is kept only the first time its cleaned text appears.
#[derive(Debug, Default)]
pub struct LineCleaner {
    accepted: Vec<String>,
    seen: HashSet<String>,
}

impl LineCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line. Returns `true` if the line was accepted.
    pub fn push(&mut self, raw: &str) -> bool {
        let line = strip_markup(raw);

        if is_metadata(&line) || line.is_empty() || self.seen.contains(&line) {
            return false;
        }

        self.seen.insert(line.clone());
        self.accepted.push(line);
        true
    }

    /// Number of lines accepted so far
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Join accepted lines into a single space-separated paragraph
    pub fn finish(self) -> String {
        self.accepted.join(" ")
    }
}
