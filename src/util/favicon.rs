//! Favicon lookup for bookmark cards.
//!
//! Terminal cells cannot show the image itself, so each card carries an
//! availability indicator instead: the favicon service URL is derived from
//! the bookmark's host and probed asynchronously. Probe results feed back
//! into the app through an event so rendering never blocks on the network.

use url::Url;

/// Favicon service endpoint. Takes a bare domain and returns a 64px icon.
const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Availability of a bookmark's favicon, as last probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaviconStatus {
    Unknown,
    Available,
    Unavailable,
}

/// Derives the favicon service URL for a bookmark URL.
///
/// Returns `None` when the bookmark URL is not http(s) or has no host
/// (e.g. `javascript:` bookmarklets or `file:` links). Those cards fall
/// back to the placeholder glyph without a probe.
pub fn favicon_url(bookmark_url: &str) -> Option<String> {
    let parsed = Url::parse(bookmark_url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;
    Some(format!("{}?domain={}&sz=64", FAVICON_SERVICE, host))
}

/// Probes whether a favicon URL resolves. Errors and non-2xx statuses both
/// read as unavailable; the probe is cosmetic and never retried.
pub async fn probe(client: &reqwest::Client, icon_url: &str) -> FaviconStatus {
    match client.get(icon_url).send().await {
        Ok(resp) if resp.status().is_success() => FaviconStatus::Available,
        Ok(resp) => {
            tracing::debug!(url = %icon_url, status = %resp.status(), "Favicon probe rejected");
            FaviconStatus::Unavailable
        }
        Err(e) => {
            tracing::debug!(url = %icon_url, error = %e, "Favicon probe failed");
            FaviconStatus::Unavailable
        }
    }
}
