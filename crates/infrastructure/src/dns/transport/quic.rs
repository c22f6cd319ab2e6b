//! QUIC Transport for DNS queries, DNS-over-QUIC (RFC 9250)
//!
//! One bidirectional stream per query, framed with the same 2-byte length
//! prefix as TCP. The message ID goes out as 0 and the caller's ID is
//! written back into the reply.

use super::tcp::{read_with_length_prefix, send_with_length_prefix};
use super::tls::build_client_config;
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_q_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const DOQ_ALPN: &[u8] = b"doq";

/// QUIC client config with the given ALPN, shared by DoQ and DoH3.
pub(crate) fn quic_client_config(
    insecure: bool,
    alpn: &[u8],
) -> Result<quinn::ClientConfig, DomainError> {
    let mut tls_config = build_client_config(insecure);
    tls_config.alpn_protocols = vec![alpn.to_vec()];
    let quic_config = quinn::crypto::rustls::QuicClientConfig::try_from(Arc::new(tls_config))
        .map_err(|e| DomainError::UpstreamConstruction(format!("QUIC TLS config: {}", e)))?;
    Ok(quinn::ClientConfig::new(Arc::new(quic_config)))
}

/// Binds an ephemeral client endpoint in the same family as `server_addr`.
pub(crate) fn client_endpoint(
    server_addr: SocketAddr,
    config: quinn::ClientConfig,
) -> Result<quinn::Endpoint, DomainError> {
    let bind: SocketAddr = if server_addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let mut endpoint = quinn::Endpoint::client(bind)
        .map_err(|e| DomainError::from_io(server_addr.to_string(), &e))?;
    endpoint.set_default_client_config(config);
    Ok(endpoint)
}

/// Opens a QUIC connection, bounded by `timeout`.
pub(crate) async fn connect(
    endpoint: &quinn::Endpoint,
    server_addr: SocketAddr,
    hostname: &str,
    timeout: Duration,
) -> Result<quinn::Connection, DomainError> {
    let connecting = endpoint.connect(server_addr, hostname).map_err(|e| {
        DomainError::TransportError(format!(
            "Failed to initiate QUIC connection to {}: {}",
            server_addr, e
        ))
    })?;

    tokio::time::timeout(timeout, connecting)
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server_addr.to_string(),
        })?
        .map_err(|e| DomainError::TransportConnectionRefused {
            server: format!("{}({}): {}", hostname, server_addr, e),
        })
}

fn with_id(mut message: Vec<u8>, id: [u8; 2]) -> Vec<u8> {
    if message.len() >= 2 {
        message[..2].copy_from_slice(&id);
    }
    message
}

pub struct QuicTransport {
    server_addr: SocketAddr,
    hostname: String,
    config: quinn::ClientConfig,
}

impl QuicTransport {
    pub fn new(server_addr: SocketAddr, hostname: String, insecure: bool) -> Result<Self, DomainError> {
        Ok(Self {
            server_addr,
            hostname,
            config: quic_client_config(insecure, DOQ_ALPN)?,
        })
    }

    async fn send_on_stream(
        &self,
        conn: &quinn::Connection,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let server = self.server_addr.to_string();
        let deadline = Instant::now() + timeout;

        let (mut send_stream, mut recv_stream) = tokio::time::timeout(timeout, conn.open_bi())
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| {
                DomainError::TransportError(format!("Failed to open QUIC stream to {}: {}", server, e))
            })?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::timeout(remaining, send_with_length_prefix(&mut send_stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.clone(),
            })??;

        send_stream.finish().map_err(|e| {
            DomainError::TransportError(format!("Failed to finish QUIC stream to {}: {}", server, e))
        })?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::timeout(remaining, read_with_length_prefix(&mut recv_stream))
            .await
            .map_err(|_| DomainError::TransportTimeout { server })?
    }
}

#[async_trait]
impl DnsTransport for QuicTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let id = match message_bytes {
            [hi, lo, ..] => [*hi, *lo],
            _ => {
                return Err(DomainError::TransportError(
                    "DNS message shorter than its header".to_string(),
                ))
            }
        };

        let endpoint = client_endpoint(self.server_addr, self.config.clone())?;
        let conn = connect(&endpoint, self.server_addr, &self.hostname, timeout).await?;
        debug!(server = %self.server_addr, hostname = %self.hostname, "QUIC connection established");

        let query = with_id(message_bytes.to_vec(), [0, 0]);
        let result = self.send_on_stream(&conn, &query, timeout).await;

        conn.close(0u32.into(), b"done");
        let response_bytes = with_id(result?, id);

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "QUIC response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "QUIC",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "QUIC"
    }
}
