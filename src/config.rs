// ⚙️ Runtime Configuration
// API key, endpoint, and retry policy. Loaded from an optional JSON file,
// with environment variables taking precedence.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default API endpoint (thecatapi.com v1)
pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1";

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "veni-vici.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// thecatapi.com API key, sent as the x-api-key header.
    /// Works without one, at a reduced rate limit.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fetch attempts per draw before reporting "no eligible record"
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fetch failures tolerated within one draw
    #[serde(default = "default_max_fetch_failures")]
    pub max_fetch_failures: u32,

    /// Pause between failure retries, in seconds
    #[serde(default = "default_failure_delay_secs")]
    pub failure_delay_secs: u64,

    /// Per-request HTTP timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_attempts() -> u32 {
    40
}

fn default_max_fetch_failures() -> u32 {
    3
}

fn default_failure_delay_secs() -> u64 {
    1
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            base_url: default_base_url(),
            max_attempts: default_max_attempts(),
            max_fetch_failures: default_max_fetch_failures(),
            failure_delay_secs: default_failure_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config: `veni-vici.json` if present, then environment overrides
    /// (CAT_API_KEY, CAT_API_URL).
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Ok(key) = env::var("CAT_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("CAT_API_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
    }

    pub fn failure_delay(&self) -> Duration {
        Duration::from_secs(self.failure_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// TESTS
// ============================================================================
