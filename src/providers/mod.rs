//! Providers module
//! AIPing endpoint resolution, model catalog and model adapters

pub mod adapters;
pub mod catalog;
pub mod constants;

pub use constants::{get_default_tool_model, DEFAULT_ENDPOINT_URL};

use std::time::Duration;
use tracing::warn;
use url::Url;

/// Resolve the endpoint URL for a request.
/// A missing or blank custom URL falls back to the AIPing default.
pub fn resolve_endpoint_url(custom_url: Option<&str>) -> String {
    match custom_url.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_ENDPOINT_URL.to_string(),
    }
}

/// Append path segments to an endpoint URL, tolerating a trailing slash.
///
/// `join_endpoint("https://aiping.cn/api/v1", &["models"])` yields
/// `https://aiping.cn/api/v1/models`.
pub fn join_endpoint(endpoint_url: &str, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint_url.trim())?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

/// Build the HTTP client used for AIPing calls with an overall timeout.
/// A builder failure is logged and replaced by a default client.
pub fn build_http_client(timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder().timeout(timeout).build() {
        Ok(http) => http,
        Err(e) => {
            warn!(
                "[AIPing] Failed to build HTTP client with {:?} timeout, requests will not time out: {}",
                timeout, e
            );
            reqwest::Client::new()
        }
    }
}
