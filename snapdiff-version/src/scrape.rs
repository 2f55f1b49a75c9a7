//! Storefront page fetch and version-token extraction.
//!
//! Extraction is a pure `&str -> Option<String>` function per source, so each
//! pattern is testable without network access. Fetching is the only impure
//! part.

use regex::Regex;

use crate::error::VersionError;

/// Key the primary storefront embeds the release version under, possibly
/// inside an escaped JSON blob.
const PRIMARY_PATTERN: &str = r#""versionDisplay\\?":\\?"(\d+(?:\.\d+){2})"#;

/// The secondary storefront renders the version as visible page text.
const SECONDARY_PATTERN: &str = r"(?:Version|版本)\s*[:：]?\s*(\d+(?:\.\d+){2})";

/// First dotted-triple the primary storefront page carries, if any.
pub fn extract_primary(body: &str) -> Option<String> {
    capture_first(PRIMARY_PATTERN, body)
}

/// First dotted-triple the secondary storefront page carries, if any.
pub fn extract_secondary(body: &str) -> Option<String> {
    capture_first(SECONDARY_PATTERN, body)
}

fn capture_first(pattern: &str, text: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Fetch a storefront page with a browser-like user agent.
///
/// Single attempt, no retry; stores reject obvious bot agents.
pub fn fetch_page(url: &str, user_agent: &str) -> Result<String, VersionError> {
    let body = ureq::get(url)
        .set("user-agent", user_agent)
        .call()?
        .into_string()?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
