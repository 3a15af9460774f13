//! Relay Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{GetResponse, PutResponse, StatsResponse};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use std::time::Duration;

/// Timeout for calls that never block server-side
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra time a blocking get allows for the response to travel back
const WAIT_MARGIN: Duration = Duration::from_secs(10);

/// Request timeout for a get with no explicit wait (server default applies)
const UNBOUNDED_WAIT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Relay broker client
///
/// # Example
///
/// ```no_run
/// use relay_sdk::RelayClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RelayClient::connect("http://127.0.0.1:8080").await?;
/// client.put("jobs", "hello").await?;
/// # Ok(())
/// # }
/// ```
pub struct RelayClient {
    url: String,
    client: HttpClient,
}

impl RelayClient {
    /// Connect to a relay daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:8080`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref().to_string();
        let client = build_client(&url, REQUEST_TIMEOUT)?;

        Ok(Self { url, client })
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Put a message onto a queue, creating the queue if needed
    ///
    /// `delivered` in the response tells whether a blocked consumer took the
    /// message directly instead of it being stored.
    pub async fn put(&self, queue: &str, message: &str) -> Result<PutResponse> {
        let mut params = ObjectParams::new();
        params.insert("queue", queue)?;
        params.insert("message", message)?;

        let response: PutResponse = self.client.request("queue.put.v1", params).await?;
        Ok(response)
    }

    /// Take the oldest message from a queue
    ///
    /// Blocks server-side for up to `timeout` when the queue is empty, rounded
    /// up to whole seconds. `None` leaves the wait to the daemon's configured
    /// default. Fails with [`SdkError::NotFound`] if the queue does not exist
    /// or the wait ran out.
    pub async fn get(&self, queue: &str, timeout: Option<Duration>) -> Result<GetResponse> {
        let mut params = ObjectParams::new();
        params.insert("queue", queue)?;
        if let Some(timeout) = timeout {
            params.insert("timeout_secs", wire_timeout_secs(timeout))?;
        }

        let client = build_client(&self.url, request_budget(timeout))?;

        let response: GetResponse = client.request("queue.get.v1", params).await?;
        Ok(response)
    }

    /// Broker statistics
    pub async fn stats(&self) -> Result<StatsResponse> {
        let response: StatsResponse = self
            .client
            .request("admin.stats.v1", ObjectParams::new())
            .await?;
        Ok(response)
    }
}

/// Server wait in whole seconds, rounded up so a sub-second wait still blocks
fn wire_timeout_secs(timeout: Duration) -> u64 {
    timeout
        .as_secs()
        .saturating_add(u64::from(timeout.subsec_nanos() > 0))
}

/// HTTP request timeout for a get; the call has to outlive the server-side wait
fn request_budget(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(t) => Duration::from_secs(wire_timeout_secs(t)).saturating_add(WAIT_MARGIN),
        None => UNBOUNDED_WAIT,
    }
}

fn build_client(url: &str, timeout: Duration) -> Result<HttpClient> {
    HttpClientBuilder::default()
        .request_timeout(timeout)
        .build(url)
        .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_keeps_url() {
        let client = RelayClient::connect("http://127.0.0.1:8080").await.unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_sub_second_wait_rounds_up() {
        assert_eq!(wire_timeout_secs(Duration::from_millis(900)), 1);
        assert_eq!(wire_timeout_secs(Duration::from_millis(1500)), 2);
        assert_eq!(wire_timeout_secs(Duration::from_secs(3)), 3);
        assert_eq!(wire_timeout_secs(Duration::ZERO), 0);
    }

    #[test]
    fn test_huge_wait_saturates() {
        assert_eq!(wire_timeout_secs(Duration::MAX), u64::MAX);
        assert_eq!(request_budget(Some(Duration::MAX)), Duration::MAX);
    }

    #[test]
    fn test_request_budget_covers_wait() {
        assert_eq!(
            request_budget(Some(Duration::from_millis(900))),
            Duration::from_secs(1) + WAIT_MARGIN
        );
        assert_eq!(request_budget(None), UNBOUNDED_WAIT);
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let result = RelayClient::connect("not a url").await;
        assert!(matches!(result, Err(SdkError::Connection(_))));
    }
}
