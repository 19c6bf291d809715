//! Readiness probe for a freshly started documentation server

use crate::crawler::{fetch_page, is_scan_complete};
use crate::url::ServerRoot;
use reqwest::Client;
use std::time::Duration;

/// Polls the package index until the server has finished its initial scan
///
/// Each iteration sleeps `interval` and then fetches `/pkg/`. The server is
/// ready once the page loads without the "scan not yet complete" alert.
///
/// # Returns
///
/// Whether the server became ready. Not being ready is not an error: the
/// crawl proceeds either way.
pub async fn wait_until_ready(
    client: &Client,
    root: &ServerRoot,
    attempts: u32,
    interval: Duration,
) -> bool {
    let url = root.package_index();

    for attempt in 1..=attempts {
        tokio::time::sleep(interval).await;
        match fetch_page(client, &url).await {
            Ok(html) if is_scan_complete(&html) => {
                tracing::debug!("Server ready after {} probe(s)", attempt);
                return true;
            }
            Ok(_) => tracing::debug!("Probe {}/{}: scan not yet complete", attempt, attempts),
            Err(e) => tracing::debug!("Probe {}/{}: {}", attempt, attempts, e),
        }
    }

    tracing::warn!(
        "{} not ready after {} probes, proceeding anyway",
        root,
        attempts
    );
    false
}
