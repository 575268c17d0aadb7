//! URL normalization for user-supplied input

use std::path::Path;

/// Host prefixes accepted without a scheme
const BARE_PREFIXES: &[&str] = &["www.", "youtube.com", "m.youtube.com", "youtu.be"];

/// Validate and canonicalize a raw URL.
///
/// Returns `None` for empty input, for anything that exists on the local
/// filesystem, and for strings that are neither http(s) URLs nor a known
/// bare host.
pub fn normalize_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() || Path::new(url).exists() {
        return None;
    }

    let lower = url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(url.to_string());
    }
    if BARE_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return Some(format!("https://{}", url));
    }
    None
}
