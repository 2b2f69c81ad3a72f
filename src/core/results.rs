use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Hostnames discovered by a single client operation, plus the raw API
/// payload for diagnostics. `hostnames` is always sorted and duplicate-free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub hostnames: Vec<String>,
    pub raw: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

impl DiscoveryResult {
    pub fn new(hostnames: BTreeSet<String>, raw: serde_json::Value) -> Self {
        Self {
            hostnames: hostnames.into_iter().collect(),
            raw,
            fetched_at: Utc::now(),
        }
    }
}

/// Union any number of hostname lists into a sorted, deduplicated sequence.
pub fn merge_sources<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut merged = BTreeSet::new();
    for source in sources {
        merged.extend(source.iter().cloned());
    }
    merged.into_iter().collect()
}

/// Write hostnames to `path`, one per line, replacing any existing content.
pub fn save_to_file<P: AsRef<Path>>(hosts: &[String], path: P) -> Result<()> {
    let mut contents = String::new();
    for host in hosts {
        contents.push_str(host);
        contents.push('\n');
    }
    fs::write(path, contents)?;
    Ok(())
}
