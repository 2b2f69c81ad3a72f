use tracing::debug;

use super::error::{Result, SubHunterError};

/// Environment variable consulted when no explicit API key is given.
pub const APIKEY_ENV: &str = "SECURITYTRAILS_APIKEY";

/// Resolve the API credential: an explicit key wins, then the environment.
/// Empty strings count as absent. The environment is injected as a lookup
/// so callers and tests control where the key actually comes from.
pub fn resolve_credential<F>(explicit: Option<&str>, env_lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = explicit {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    if let Some(key) = env_lookup(APIKEY_ENV) {
        if !key.is_empty() {
            debug!("Using API key from {}", APIKEY_ENV);
            return Ok(key);
        }
    }

    Err(SubHunterError::Config(format!(
        "SecurityTrails API key not provided. Set {} or pass one explicitly.",
        APIKEY_ENV
    )))
}
