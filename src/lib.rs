//! # Sub Hunter
//!
//! SecurityTrails-backed subdomain discovery and aggregation.
//!
//! ## Features
//!
//! - **Two endpoints**: simple subdomain listing and paginated domain search
//! - **Resilient**: linear-backoff retries around every API call
//! - **Rate-limit aware**: honors 429s and paces paginated requests
//! - **Aggregation**: deduplicated, sorted hostname sets with merge and
//!   flat-file output helpers
//!
//! ## Example
//!
//! ```rust,no_run
//! use sub_hunter::SecurityTrailsClient;
//!
//! # async fn example() -> sub_hunter::Result<()> {
//! let client = SecurityTrailsClient::new(Some("your-api-key"))?;
//! let discovery = client.list_subdomains("example.com").await?;
//!
//! println!("Found {} subdomains", discovery.hostnames.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod providers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    merge_sources, resolve_credential, save_to_file, Config, DiscoveryResult, Result,
    SearchConfig, SecurityTrailsConfig, SubHunterError, APIKEY_ENV,
};
pub use crate::providers::SecurityTrailsClient;
