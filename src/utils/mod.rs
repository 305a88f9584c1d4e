use std::path::Path;

/// Characters that are not allowed in file names on common filesystems
const INVALID_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Sanitize filename for safe filesystem usage by removing invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect()
}

/// Escape a literal name for use as a yt-dlp `--output` template
pub fn escape_output_template(name: &str) -> String {
    name.replace('%', "%%")
}

/// Path of the subtitle file yt-dlp writes for `title` and `lang`
pub fn subtitle_path(dir: &Path, title: &str, lang: &str) -> std::path::PathBuf {
    dir.join(format!("{}.{}.vtt", title, lang))
}

/// Path of the plain-text transcript written for `title`
pub fn transcript_path(dir: &Path, title: &str) -> std::path::PathBuf {
    dir.join(format!("{}.txt", title))
}

/// Check if the current environment has required tools
pub async fn check_dependencies(yt_dlp_path: &str) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(yt_dlp_path).await {
        missing.push(format!("{} - required to download captions", yt_dlp_path));
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
