//! Bounded reachability checks.

use futures_util::TryStreamExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::data::ProbeOptions;
use crate::effects::http::HttpClient;

/// Build the `Range` header covering the first `window_bytes` bytes.
///
/// ```
/// use hubmirror_fetch::range_header;
///
/// let (name, value) = range_header(102_400);
/// assert_eq!(name, "Range");
/// assert_eq!(value, "bytes=0-102399");
/// ```
pub fn range_header(window_bytes: u64) -> (String, String) {
    (
        "Range".to_string(),
        format!("bytes=0-{}", window_bytes.max(1) - 1),
    )
}

/// Check that `url` serves the first `options.window_bytes` of its body.
///
/// Returns `true` once the whole window has been read, or the body ended
/// early without error. Every other outcome collapses into `false`: a
/// transport error, a non-success status, a broken body, or `cancel` firing
/// before the window is complete. There is no retry.
///
/// Cancellation is cooperative: it is noticed the next time the request or
/// the body read yields, and dropping the in-flight request aborts it.
pub async fn probe<C: HttpClient>(
    client: &C,
    url: &str,
    options: &ProbeOptions,
    cancel: &CancellationToken,
) -> bool {
    let window = options.window_bytes.max(1);
    let headers = [range_header(window)];

    let read_window = async {
        let mut body = client.stream(url, &headers).await?;
        let mut received = 0u64;
        while received < window {
            match body.try_next().await? {
                Some(chunk) => received += chunk.len() as u64,
                None => break,
            }
        }
        Ok::<u64, C::Error>(received)
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!(url, "probe cancelled");
            false
        }
        result = read_window => match result {
            Ok(received) => {
                debug!(url, received, "probe succeeded");
                true
            }
            Err(e) => {
                debug!(url, error = %e, "probe failed");
                false
            }
        },
    }
}

/// HEAD `url` and report whether it answered with a success status.
pub async fn is_reachable<C: HttpClient>(client: &C, url: &str) -> bool {
    match client.head(url).await {
        Ok(info) => {
            debug!(url, content_length = ?info.content_length, "url reachable");
            true
        }
        Err(e) => {
            debug!(url, error = %e, "url unreachable");
            false
        }
    }
}
