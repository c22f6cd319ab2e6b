//! HTTP/3 Transport for DNS queries, DNS-over-HTTPS carried over QUIC
//!
//! Same `application/dns-message` POST as the HTTPS transport, sent on a
//! fresh HTTP/3 connection. `h3://` in the server URL becomes `https://`
//! on the request line.

use super::https::DNS_MESSAGE_CONTENT_TYPE;
use super::quic::{client_endpoint, connect, quic_client_config};
use super::resolver::resolve_all;
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::{Buf, Bytes, BytesMut};
use ferrous_q_domain::DomainError;
use std::time::Duration;
use tracing::debug;

const H3_ALPN: &[u8] = b"h3";
const DEFAULT_HTTPS_PORT: u16 = 443;

type H3SendRequest = h3::client::SendRequest<h3_quinn::OpenStreams, Bytes>;

pub struct H3Transport {
    https_url: http::Uri,
    hostname: String,
    port: u16,
    config: quinn::ClientConfig,
}

impl H3Transport {
    pub fn new(h3_url: &str, hostname: String, insecure: bool) -> Result<Self, DomainError> {
        let https_url: http::Uri = h3_url
            .replacen("h3://", "https://", 1)
            .parse()
            .map_err(|e| DomainError::UpstreamConstruction(format!("invalid H3 URL '{}': {}", h3_url, e)))?;
        let port = https_url.port_u16().unwrap_or(DEFAULT_HTTPS_PORT);

        Ok(Self {
            https_url,
            hostname,
            port,
            config: quic_client_config(insecure, H3_ALPN)?,
        })
    }

    async fn open(&self, timeout: Duration) -> Result<H3SendRequest, DomainError> {
        let addrs = resolve_all(&self.hostname, self.port, timeout).await?;
        let addr = addrs[0];

        let endpoint = client_endpoint(addr, self.config.clone())?;
        let quinn_conn = connect(&endpoint, addr, &self.hostname, timeout).await?;

        let (mut driver, send_request) = h3::client::new(h3_quinn::Connection::new(quinn_conn))
            .await
            .map_err(|e| {
                DomainError::TransportError(format!("Failed to create H3 client for {}: {}", addr, e))
            })?;

        tokio::spawn(async move {
            let _ = std::future::poll_fn(|cx| driver.poll_close(cx)).await;
        });

        debug!(server = %addr, hostname = %self.hostname, "H3 connection established");
        Ok(send_request)
    }

    async fn execute_request(
        &self,
        send_request: &mut H3SendRequest,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Bytes, DomainError> {
        let url = self.https_url.to_string();
        let timed_out = || DomainError::TransportTimeout { server: url.clone() };
        let failed = |what: &str, e: &dyn std::fmt::Display| {
            DomainError::TransportError(format!("H3 {} with {}: {}", what, url, e))
        };

        let request = http::Request::builder()
            .method("POST")
            .uri(self.https_url.clone())
            .header("content-type", DNS_MESSAGE_CONTENT_TYPE)
            .header("accept", DNS_MESSAGE_CONTENT_TYPE)
            .body(())
            .map_err(|e| failed("request build failed", &e))?;

        let mut stream = tokio::time::timeout(timeout, send_request.send_request(request))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| failed("request failed", &e))?;

        tokio::time::timeout(timeout, stream.send_data(Bytes::copy_from_slice(message_bytes)))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| failed("send failed", &e))?;

        tokio::time::timeout(timeout, stream.finish())
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| failed("finish failed", &e))?;

        let response = tokio::time::timeout(timeout, stream.recv_response())
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| failed("response failed", &e))?;

        if !response.status().is_success() {
            return Err(DomainError::TransportError(format!(
                "H3 server {} returned HTTP {}",
                url,
                response.status().as_u16()
            )));
        }

        let mut body = BytesMut::new();
        while let Some(mut chunk) = tokio::time::timeout(timeout, stream.recv_data())
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| failed("body read failed", &e))?
        {
            body.extend_from_slice(chunk.chunk());
            chunk.advance(chunk.remaining());
        }

        Ok(body.freeze())
    }
}

#[async_trait]
impl DnsTransport for H3Transport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let mut send_request = self.open(timeout).await?;
        let response_bytes = self.execute_request(&mut send_request, message_bytes, timeout).await?;

        debug!(
            url = %self.https_url,
            response_len = response_bytes.len(),
            "DoH3 response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes.to_vec(),
            protocol_used: "H3",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "H3"
    }
}
