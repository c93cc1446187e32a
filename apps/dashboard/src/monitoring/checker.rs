use anyhow::{Result, anyhow, bail};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::types::{EndpointSpec, ProbeKind};

/// Checker trait for the different probe kinds
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Probe the endpoint once. `Ok` means reachable, the error carries the reason it was not.
    async fn check(&self, endpoint: &EndpointSpec) -> Result<()>;
}

/// TCP port checker
pub struct TcpChecker {
    timeout_duration: Duration,
}

impl TcpChecker {
    pub fn new(timeout_duration: Duration) -> Self {
        Self { timeout_duration }
    }
}

#[async_trait::async_trait]
impl Checker for TcpChecker {
    async fn check(&self, endpoint: &EndpointSpec) -> Result<()> {
        let ProbeKind::Tcp { port } = endpoint.probe else {
            bail!("{} is not a TCP endpoint", endpoint.name);
        };

        // Resolution happens inside connect, so DNS is covered by the same deadline
        let connect = TcpStream::connect((endpoint.target.as_str(), port));

        let stream = timeout(self.timeout_duration, connect)
            .await
            .map_err(|_| anyhow!("TCP connection timeout"))?
            .map_err(|e| anyhow!("TCP connection failed: {}", e))?;

        drop(stream);
        Ok(())
    }
}

/// HTTP(S) checker that looks for an "unavailable" marker in the response body
pub struct ContentChecker {
    client: reqwest::Client,
}

impl ContentChecker {
    pub fn new(timeout_duration: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout_duration).build()?;

        Ok(Self { client })
    }

    #[cfg(test)]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Checker for ContentChecker {
    async fn check(&self, endpoint: &EndpointSpec) -> Result<()> {
        let ProbeKind::Content { unavailable_marker } = &endpoint.probe else {
            bail!("{} is not a content endpoint", endpoint.name);
        };

        let body = self
            .client
            .get(&endpoint.target)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow!("HTTP check failed: {}", e))?
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        if body.contains(unavailable_marker.as_str()) {
            bail!("Response contains unavailable marker {:?}", unavailable_marker);
        }

        Ok(())
    }
}
