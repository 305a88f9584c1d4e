use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcript::cli::{Cli, Commands};
use yt_transcript::config::Config;
use yt_transcript::extractors::{require_video_id, YoutubeCaptionFetcher};
use yt_transcript::server::{self, AppState};
use yt_transcript::{output, transcript, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_logs);

    let config = Config::load(cli.config_file.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            warn_missing_dependencies(&config).await;

            let config = config.with_server_overrides(host, port);
            let addr = config.bind_addr()?;
            let fetcher = YoutubeCaptionFetcher::new(&config.downloader.yt_dlp_path, config.work_dir()?);

            server::serve(addr, AppState::new(fetcher)).await?;
        }
        Commands::Fetch { url, output, format } => {
            warn_missing_dependencies(&config).await;

            let video_id = require_video_id(Some(url.as_str()))?;
            tracing::info!("Starting transcript fetch for video: {}", video_id);

            let fetcher = YoutubeCaptionFetcher::new(&config.downloader.yt_dlp_path, config.work_dir()?);

            let progress = if cli.quiet {
                ProgressBar::hidden()
            } else {
                ProgressBar::new_spinner()
            };
            progress.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .context("Invalid progress template")?,
            );
            progress.set_message("Downloading captions with yt-dlp...");
            progress.enable_steady_tick(Duration::from_millis(120));

            let result = fetcher.download_transcript(&url).await;
            progress.finish_and_clear();
            let text = result?;

            match output {
                Some(path) => {
                    output::save_to_file(&url, &text, &path, &format)?;
                    println!("Transcript saved to: {}", path.display());
                }
                None => output::print_to_console(&url, &text, &format)?,
            }
        }
        Commands::Clean { input, output, format } => {
            let output_path = output.unwrap_or_else(|| input.with_extension("txt"));
            let text = transcript::extract_plain_text(&input, &output_path)?;

            output::print_to_console(&input.display().to_string(), &text, &format)?;
            if !cli.quiet {
                eprintln!("Transcript saved to: {}", output_path.display());
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                let path = config.save(cli.config_file.as_deref())?;
                println!("Configuration written to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "yt_transcript=debug" } else { "yt_transcript=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so `fetch` and `clean` output stays pipeable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Check for required external dependencies (non-fatal)
async fn warn_missing_dependencies(config: &Config) {
    let missing = utils::check_dependencies(&config.downloader.yt_dlp_path).await;
    if !missing.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }
}
