use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Hostname shape: alphanumeric labels of up to 63 characters with
    /// interior hyphens, at least two labels.
    static ref DOMAIN_PATTERN: Regex = Regex::new(
        r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
    )
    .unwrap();
}

/// Cheap shape check for a target domain before any network call.
pub fn is_valid_domain(candidate: &str) -> bool {
    candidate.len() <= 253 && DOMAIN_PATTERN.is_match(candidate)
}

/// The listing endpoint returns fragments like "www" or "api"; rebuild them
/// into fully qualified hostnames under `domain`. Fragments that already
/// carry the domain suffix are kept verbatim; empty fragments contribute
/// nothing.
pub fn qualify_fragment(fragment: &str, domain: &str) -> Option<String> {
    if fragment.is_empty() {
        return None;
    }
    if fragment.ends_with(domain) {
        Some(fragment.to_string())
    } else {
        Some(format!("{}.{}", fragment, domain))
    }
}

/// Apex containment filter for search records: the hostname must be the apex
/// itself or live under it on a label boundary, so lookalikes such as
/// "evil-example.com" are not admitted for "example.com".
pub fn within_apex(hostname: &str, domain: &str) -> bool {
    match hostname.strip_suffix(domain) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}
