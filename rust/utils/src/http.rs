use std::time::Duration;

use reqwest::StatusCode;
use tracing::trace;

use crate::error::{Result, ResultExt};
use crate::slow_warn::warn_if_slow;

/// Sends a prepared request. Non-2xx responses are returned as-is; only
/// failures to obtain a response at all become errors.
pub async fn execute(
    client: &reqwest::Client,
    request: reqwest::Request,
    slow_threshold: Duration,
) -> Result<reqwest::Response> {
    let method = request.method().clone();
    let url = request.url().clone();
    trace!("HTTP {method} {url}");
    let resp = warn_if_slow(
        || format!("HTTP request {method} {url}"),
        slow_threshold,
        client.execute(request),
    )
    .await
    .error_with_context(|| format!("HTTP request {method} {url} failed"))?;
    trace!("HTTP {method} {url} -> {}", resp.status());
    Ok(resp)
}

/// Human-readable status line text, e.g. `404 Not Found`.
pub fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}
