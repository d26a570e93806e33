//! Anonymous usage statistics
//!
//! One fire-and-forget GET per run. Failures never affect the pipeline.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

const COLLECTOR_URL: &str = "http://collector.singer.io/i";
const USAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawn the usage ping against the public collector
pub fn spawn_usage_stats() -> JoinHandle<()> {
    info!(
        "Sending version information to singer.io. \
         To disable sending anonymous usage data, set the config parameter \
         \"disable_collection\" to true"
    );
    spawn_usage_stats_to(COLLECTOR_URL)
}

/// Spawn the usage ping against `collector_url`
///
/// The returned handle may be dropped; the task is never awaited by the pipeline.
pub fn spawn_usage_stats_to(collector_url: &str) -> JoinHandle<()> {
    let url = collector_url.to_string();
    tokio::spawn(async move {
        match send_usage_stats(&url).await {
            Ok(status) => debug!(status, "Usage stats sent"),
            Err(e) => debug!(error = %e, "Collection request failed"),
        }
    })
}

async fn send_usage_stats(url: &str) -> Result<u16, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(USAGE_TIMEOUT).build()?;
    let response = client
        .get(url)
        .query(&[
            ("e", "se"),
            ("aid", "singer"),
            ("se_ca", "target-rest"),
            ("se_ac", "open"),
            ("se_la", env!("CARGO_PKG_VERSION")),
        ])
        .send()
        .await?;
    Ok(response.status().as_u16())
}
