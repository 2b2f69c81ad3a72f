use serde::{Deserialize, Serialize};

/// Default SecurityTrails API base.
pub const DEFAULT_BASE_URL: &str = "https://api.securitytrails.com/v1";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub securitytrails: SecurityTrailsConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityTrailsConfig {
    /// API key; prefer the SECURITYTRAILS_APIKEY environment variable.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Attempts per request before giving up.
    pub retries: u32,
    /// Base for the linear retry backoff (sleep = backoff_ms * attempt).
    pub backoff_ms: u64,
    /// Pause between consecutive requests to stay under provider limits.
    pub page_pause_ms: u64,
}

impl Default for SecurityTrailsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            retries: 3,
            backoff_ms: 1000,
            page_pause_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub page_size: usize,
    pub max_pages: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_pages: 10,
        }
    }
}
