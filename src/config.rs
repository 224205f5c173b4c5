use std::path::PathBuf;
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_WATCH_BASE: &str = "https://www.youtube.com";
const DEFAULT_TIMEDTEXT_BASE: &str = "https://www.youtube.com/api/timedtext";
const DEFAULT_MIRROR_BASE: &str = "https://youtubetranscript.com";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API key; the `YOUTUBE_API_KEY` env var overrides.
    pub api_key: Option<String>,
    pub default_lang: Option<String>,
    pub default_format: Option<String>,
    pub api_base: String,
    pub watch_base: String,
    pub timedtext_base: String,
    pub mirror_base: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Deadline for one whole extraction in seconds.
    pub extract_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            default_lang: None,
            default_format: None,
            api_base: DEFAULT_API_BASE.to_string(),
            watch_base: DEFAULT_WATCH_BASE.to_string(),
            timedtext_base: DEFAULT_TIMEDTEXT_BASE.to_string(),
            mirror_base: DEFAULT_MIRROR_BASE.to_string(),
            request_timeout_secs: 30,
            extract_timeout_secs: 120,
        }
    }
}

impl Config {
    /// Load config from ~/.config/ytcap/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut config = if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            debug!("No config file found at {}", path.display());
            Config::default()
        };

        if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
            if !key.trim().is_empty() {
                config.api_key = Some(key.trim().to_string());
            }
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytcap")
        .join("config.toml")
}
