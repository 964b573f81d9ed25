//! Shared HTTP plumbing for the archive and VK clients

use crate::error::{Error, RemoteError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("comic-wall-poster/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client whose every request is bounded by `timeout`
pub(crate) fn build_client(timeout: Duration) -> Result<Client, RemoteError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Parse a base URL so that relative paths join beneath it
///
/// A missing trailing slash is added; otherwise `Url::join` would replace the last segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| Error::Config {
        message: format!("invalid base URL '{}': {}", raw, e),
        key: None,
    })
}

/// Turn a non-success status into [`RemoteError::Status`]
///
/// The reported URL has its query string removed.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut url = response.url().clone();
    url.set_query(None);
    let body = response.text().await.unwrap_or_default();

    Err(RemoteError::Status {
        url: url.to_string(),
        status,
        body,
    })
}

/// Read the body and parse it as JSON, reporting parse failures as [`RemoteError::Malformed`]
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, RemoteError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| RemoteError::malformed(what, e))
}
