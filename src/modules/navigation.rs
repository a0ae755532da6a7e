// Pure navigation logic - no Tauri imports allowed.
// Turns raw address-bar text into something a content view can load.

use url::Url;
use crate::settings::SearchEngine;

/// Schemes that mark the input as an explicit location.
const PASSTHROUGH_SCHEMES: [&str; 5] = ["http", "https", "file", "about", "data"];

/// Logic for parsing address-bar input into a navigable URL.
///
/// Purely local string manipulation: no DNS lookups, no prefetching,
/// nothing is sent anywhere until the content view loads the result.
///
/// 1. Explicit scheme (`https://x.com`, `about:blank`) -> unchanged.
/// 2. Contains a dot and no whitespace -> `https://` prepended.
/// 3. Anything else -> search query on the configured engine.
pub fn normalize_address(input: &str, engine: SearchEngine) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return "about:blank".to_string();
    }

    if has_explicit_scheme(trimmed) {
        return trimmed.to_string();
    }

    if trimmed.contains('.') && !trimmed.chars().any(char::is_whitespace) {
        return format!("https://{}", trimmed);
    }

    engine.query_url(trimmed)
}

fn has_explicit_scheme(input: &str) -> bool {
    // "example.com:8080" parses with scheme "example.com", hence the allowlist.
    match Url::parse(input) {
        Ok(u) => PASSTHROUGH_SCHEMES.contains(&u.scheme()),
        Err(_) => false,
    }
}
