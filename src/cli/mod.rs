use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt-transcript",
    about = "yt-transcript - Plain-text transcripts from YouTube auto-generated captions",
    version,
    long_about = "Serves a small HTTP API that downloads English auto-generated captions for a YouTube video with yt-dlp, strips markup and repeated lines, and returns the transcript as plain text. The same pipeline is available from the command line."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a config file (defaults to ./config.yaml, then the user config dir)
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP transcript service
    Serve {
        /// Address to bind (overrides the config file)
        #[arg(long, env = "YT_TRANSCRIPT_HOST", value_name = "HOST")]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long, env = "YT_TRANSCRIPT_PORT", value_name = "PORT")]
        port: Option<u16>,
    },

    /// Fetch the transcript of a single YouTube video
    Fetch {
        /// YouTube URL (youtube.com/watch?v=..., m.youtube.com, youtu.be/...)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Clean a local .vtt subtitle file into plain text
    Clean {
        /// Subtitle file to clean
        #[arg(value_name = "VTT_FILE")]
        input: PathBuf,

        /// Transcript file to write (defaults to the input path with a .txt extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Console output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON object with source and transcript
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
