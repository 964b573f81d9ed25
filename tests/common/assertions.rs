//! Inspection helpers over the requests a mock server received

use std::collections::HashMap;
use wiremock::{MockServer, Request};

/// Paths of all received requests, in arrival order
pub async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

/// The single request received for `route`
///
/// Panics if `route` was requested zero or several times.
pub async fn single_request(server: &MockServer, route: &str) -> Request {
    let mut matching: Vec<Request> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == route)
        .collect();
    assert_eq!(
        matching.len(),
        1,
        "expected exactly one request to {}, got {}",
        route,
        matching.len()
    );
    matching.remove(0)
}

/// Decoded query string parameters
pub fn query_fields(request: &Request) -> HashMap<String, String> {
    request.url.query_pairs().into_owned().collect()
}

/// Decoded `application/x-www-form-urlencoded` body fields
pub fn form_fields(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}
