//! HTTPS Transport for DNS queries, DNS-over-HTTPS (RFC 8484)
//!
//! Wire format (HTTP):
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_q_domain::{DomainError, UPSTREAM_TIMEOUT};
use std::time::Duration;
use tracing::debug;

pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// One client per run; `insecure` accepts any server certificate.
pub fn build_client(insecure: bool) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(UPSTREAM_TIMEOUT)
        .danger_accept_invalid_certs(insecure)
        .build()
        .map_err(|e| DomainError::UpstreamConstruction(format!("HTTP client: {}", e)))
}

pub struct HttpsTransport {
    url: String,
    client: reqwest::Client,
}

impl HttpsTransport {
    pub fn new(url: String, insecure: bool) -> Result<Self, DomainError> {
        Ok(Self {
            url,
            client: build_client(insecure)?,
        })
    }
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        debug!(
            url = %self.url,
            message_len = message_bytes.len(),
            "Sending DoH query"
        );

        let response = tokio::time::timeout(
            timeout,
            self.client
                .post(&self.url)
                .header("Content-Type", DNS_MESSAGE_CONTENT_TYPE)
                .header("Accept", DNS_MESSAGE_CONTENT_TYPE)
                .body(message_bytes.to_vec())
                .send(),
        )
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: self.url.clone(),
        })?
        .map_err(|e| DomainError::TransportError(format!("DoH request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::TransportError(format!(
                "DoH server {} returned HTTP {}: {}",
                self.url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let response_bytes = tokio::time::timeout(timeout, response.bytes())
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.url.clone(),
            })?
            .map_err(|e| {
                DomainError::TransportError(format!(
                    "Failed to read DoH response from {}: {}",
                    self.url, e
                ))
            })?;

        debug!(
            url = %self.url,
            response_len = response_bytes.len(),
            "DoH response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes.to_vec(),
            protocol_used: "HTTPS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "HTTPS"
    }
}
