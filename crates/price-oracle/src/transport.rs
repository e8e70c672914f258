use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::StatusCode;
use thiserror::Error;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const TCP_KEEPALIVE: Duration = Duration::from_secs(60);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// A single outbound GET returning the raw response body.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Pooled keep-alive client shared by all three providers.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(TCP_KEEPALIVE)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build()?;

        Ok(ReqwestTransport { client })
    }
}

#[async_trait]
impl HttpGet for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            error!("Price provider request failed with status: {}", response.status());
            return Err(TransportError::RequestFailed(response.status()));
        }

        let raw_text = response.text().await?;
        debug!("Received {} bytes from price provider", raw_text.len());

        Ok(raw_text)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed with status: {0}")]
    RequestFailed(StatusCode),

    #[error("Error while making request: {0}")]
    ApiCallError(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_client_with_default_timeout() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_api_call_error() {
        let transport = ReqwestTransport::with_timeout(Duration::from_millis(500)).unwrap();

        // Nothing listens on the discard port of localhost
        let result = transport.get("http://127.0.0.1:9/").await;

        assert!(matches!(result, Err(TransportError::ApiCallError(_))));
    }
}
