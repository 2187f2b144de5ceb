//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, Url};

/// Connection timeout for provider API requests unless configured otherwise
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a provider client that bounds only the connection phase.
///
/// Transcription of a long clip or a large upload can legitimately take
/// minutes once connected, so no overall request timeout is set.
pub(crate) fn provider_client(connect_timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            Client::new()
        })
}

/// Append `segments` to `base`, each percent-encoded as exactly one path segment.
pub(crate) fn segment_url(base: &str, segments: &[&str]) -> Result<Url, String> {
    let mut url = Url::parse(base).map_err(|e| format!("invalid base URL {}: {}", base, e))?;
    url.path_segments_mut()
        .map_err(|_| format!("base URL {} cannot carry a path", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Format a non-success provider response as `"<status>: <body>"`.
pub(crate) async fn rejection(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("{}: {}", status.as_u16(), body.trim())
}
