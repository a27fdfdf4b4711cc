/// HTTP client for forwarding requests to downstream services.
///
/// No automatic retries: retrying belongs to the client or the
/// downstream, not to the routing layer.
use std::time::Duration;

use crate::errors::AppError;

pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// `timeout` bounds the whole request (connect + read); connection
    /// establishment is additionally capped at 3s.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .pool_max_idle_per_host(16)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(3))
            .build()?;
        Ok(Self { client })
    }

    pub async fn forward(
        &self,
        method: reqwest::Method,
        url: &str,
        headers: reqwest::header::HeaderMap,
        body: Vec<u8>,
    ) -> Result<reqwest::Response, AppError> {
        self.client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Upstream request failed: {}", e);
                if e.is_timeout() {
                    AppError::UpstreamTimeout
                } else {
                    AppError::Upstream(e.to_string())
                }
            })
    }
}
