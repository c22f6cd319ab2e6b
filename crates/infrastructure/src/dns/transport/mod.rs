#[cfg(feature = "dns-over-h3")]
pub mod h3;
pub mod https;
#[cfg(feature = "dns-over-quic")]
pub mod quic;
pub mod resolver;
pub mod tcp;
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use ferrous_q_domain::{DnsProtocol, DomainError};
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    #[cfg(feature = "dns-over-rustls")]
    Tls(tls::TlsTransport),
    #[cfg(feature = "dns-over-https")]
    Https(https::HttpsTransport),
    #[cfg(feature = "dns-over-quic")]
    Quic(quic::QuicTransport),
    #[cfg(feature = "dns-over-h3")]
    H3(h3::H3Transport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-https")]
            Self::Https(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-quic")]
            Self::Quic(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-h3")]
            Self::H3(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }
}

fn require_resolved(protocol: &DnsProtocol) -> Result<std::net::SocketAddr, DomainError> {
    protocol.socket_addr().ok_or_else(|| {
        DomainError::UpstreamConstruction(format!(
            "{} transport requires a resolved address, got: {}",
            protocol.protocol_name(),
            protocol
        ))
    })
}

/// Builds the transport for an already-resolved protocol. `insecure` turns off
/// certificate verification for TLS, HTTPS, QUIC and HTTP/3.
pub fn create_transport(protocol: &DnsProtocol, insecure: bool) -> Result<Transport, DomainError> {
    match protocol {
        DnsProtocol::Udp { .. } => Ok(Transport::Udp(udp::UdpTransport::new(require_resolved(
            protocol,
        )?))),
        DnsProtocol::Tcp { .. } => Ok(Transport::Tcp(tcp::TcpTransport::new(require_resolved(
            protocol,
        )?))),

        #[cfg(feature = "dns-over-rustls")]
        DnsProtocol::Tls { hostname, .. } => Ok(Transport::Tls(tls::TlsTransport::new(
            require_resolved(protocol)?,
            hostname.to_string(),
            insecure,
        )?)),

        #[cfg(not(feature = "dns-over-rustls"))]
        DnsProtocol::Tls { .. } => {
            let addr = require_resolved(protocol)?;
            tracing::warn!("TLS feature not enabled, falling back to TCP for {}", addr);
            Ok(Transport::Tcp(tcp::TcpTransport::new(addr)))
        }

        #[cfg(feature = "dns-over-https")]
        DnsProtocol::Https { url, .. } => Ok(Transport::Https(https::HttpsTransport::new(
            url.to_string(),
            insecure,
        )?)),

        #[cfg(not(feature = "dns-over-https"))]
        DnsProtocol::Https { url, .. } => Err(DomainError::UpstreamConstruction(format!(
            "HTTPS feature not enabled. Enable 'dns-over-https' feature to use: {}",
            url
        ))),

        #[cfg(feature = "dns-over-quic")]
        DnsProtocol::Quic { hostname, .. } => Ok(Transport::Quic(quic::QuicTransport::new(
            require_resolved(protocol)?,
            hostname.to_string(),
            insecure,
        )?)),

        #[cfg(not(feature = "dns-over-quic"))]
        DnsProtocol::Quic { .. } => Err(DomainError::UpstreamConstruction(format!(
            "QUIC feature not enabled. Enable 'dns-over-quic' feature to use: {}",
            protocol
        ))),

        #[cfg(feature = "dns-over-h3")]
        DnsProtocol::H3 { url, hostname } => Ok(Transport::H3(h3::H3Transport::new(
            url,
            hostname.to_string(),
            insecure,
        )?)),

        #[cfg(not(feature = "dns-over-h3"))]
        DnsProtocol::H3 { url, .. } => Err(DomainError::UpstreamConstruction(format!(
            "HTTP/3 feature not enabled. Enable 'dns-over-h3' feature to use: {}",
            url
        ))),
    }
}
