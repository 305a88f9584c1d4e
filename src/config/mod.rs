use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// yt-dlp settings
    pub downloader: DownloaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// yt-dlp executable name or path
    pub yt_dlp_path: String,

    /// Directory where subtitle and transcript files are written
    /// (process working directory if unset)
    pub work_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            work_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`, the default locations, or built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!("No default config location ({}), using defaults", e);
                    return Ok(Self::default());
                }
            },
        };

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            Self::from_file(&config_path)
        } else if path.is_some() {
            anyhow::bail!("Config file does not exist: {}", config_path.display());
        } else {
            Ok(Self::default())
        }
    }

    /// Read and validate a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("yt-transcript").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.downloader.yt_dlp_path.trim().is_empty() {
            anyhow::bail!("downloader.yt_dlp_path must not be empty");
        }

        self.bind_addr()?;

        Ok(())
    }

    /// Apply command-line overrides for the server address
    pub fn with_server_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .with_context(|| format!("Invalid server address: {}", addr))
    }

    /// Directory for subtitle and transcript files
    pub fn work_dir(&self) -> Result<PathBuf> {
        match &self.downloader.work_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Could not determine working directory"),
        }
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Server: {}:{}", self.server.host, self.server.port);
        println!("  yt-dlp: {}", self.downloader.yt_dlp_path);
        match &self.downloader.work_dir {
            Some(dir) => println!("  Work Dir: {}", dir.display()),
            None => println!("  Work Dir: (current directory)"),
        }
    }
}
