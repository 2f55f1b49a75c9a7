//! # snapdiff-version
//!
//! Discovers the current (client, resource) version pair.
//!
//! The client version comes from one of two storefront pages — primary
//! first, secondary only when the primary yields nothing, first non-empty
//! wins. The resource version comes back in a response header of the login
//! endpoint, probed with the resolved client version.

pub mod api;
pub mod error;
pub mod scrape;

use log::warn;

use snapdiff_core::config::VersionConfig;
use snapdiff_core::types::VersionPair;

pub use error::VersionError;

/// Resolve the current [`VersionPair`].
///
/// Fails with [`VersionError::Unavailable`] if both client-version sources
/// come up empty, or if the resource-version probe yields nothing.
pub fn resolve(config: &VersionConfig) -> Result<VersionPair, VersionError> {
    let client_version = client_version_from_sources(
        || scrape_source(&config.primary_store_url, config, scrape::extract_primary),
        || scrape_source(&config.secondary_store_url, config, scrape::extract_secondary),
    )
    .ok_or_else(|| VersionError::Unavailable {
        reason: "no client version from either storefront source".to_string(),
    })?;

    let resource_version = api::fetch_resource_version(config, &client_version)?;
    Ok(VersionPair {
        client_version,
        resource_version,
    })
}

/// First non-empty token wins; the secondary source is consulted only when
/// the primary produced nothing.
fn client_version_from_sources<P, S>(primary: P, secondary: S) -> Option<String>
where
    P: FnOnce() -> Option<String>,
    S: FnOnce() -> Option<String>,
{
    match primary() {
        Some(token) if !token.is_empty() => Some(token),
        _ => secondary().filter(|token| !token.is_empty()),
    }
}

/// One storefront attempt: fetch the page, extract with that source's
/// pattern. A fetch failure is logged and treated as "nothing found" so the
/// fallback source still gets its turn.
fn scrape_source(
    url: &str,
    config: &VersionConfig,
    extract: fn(&str) -> Option<String>,
) -> Option<String> {
    match scrape::fetch_page(url, &config.user_agent) {
        Ok(body) => extract(&body),
        Err(err) => {
            warn!("storefront fetch failed for {url}: {err}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn primary_wins_when_non_empty() {
        let secondary_called = Cell::new(false);
        let result = client_version_from_sources(
            || Some("3.4.1".to_string()),
            || {
                secondary_called.set(true);
                Some("9.9.9".to_string())
            },
        );
        assert_eq!(result.as_deref(), Some("3.4.1"));
        assert!(!secondary_called.get(), "secondary must not be consulted");
    }

    #[test]
    fn secondary_wins_when_primary_empty() {
        let result = client_version_from_sources(
            || Some(String::new()),
            || Some("3.4.0".to_string()),
        );
        assert_eq!(result.as_deref(), Some("3.4.0"));
    }

    #[test]
    fn secondary_wins_when_primary_absent() {
        let result = client_version_from_sources(|| None, || Some("3.4.0".to_string()));
        assert_eq!(result.as_deref(), Some("3.4.0"));
    }

    #[test]
    fn both_empty_is_none() {
        assert_eq!(client_version_from_sources(|| None, || None), None);
        assert_eq!(
            client_version_from_sources(|| Some(String::new()), || Some(String::new())),
            None
        );
    }
}
