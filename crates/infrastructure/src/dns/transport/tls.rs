//! TLS Transport for DNS queries, DNS-over-TLS (RFC 7858)
//!
//! Same 2-byte length framing as TCP, inside a rustls session. The client
//! config is built once per transport; with `insecure` the server certificate
//! is accepted without verification.

use super::tcp::{connect, read_with_length_prefix, send_with_length_prefix};
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_q_domain::DomainError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

/// Accepts any server certificate. Only reachable through `--insecure`.
#[derive(Debug)]
struct NoVerification;

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
        ]
    }
}

pub fn client_config(insecure: bool) -> Arc<rustls::ClientConfig> {
    Arc::new(build_client_config(insecure))
}

/// Same trust setup as [`client_config`], left unwrapped so QUIC-based
/// transports can set their ALPN before sharing it.
pub fn build_client_config(insecure: bool) -> rustls::ClientConfig {
    let _ = rustls::crypto::ring::default_provider().install_default();
    if insecure {
        warn!("TLS certificate verification disabled");
        rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerification))
            .with_no_client_auth()
    } else {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    }
}

pub struct TlsTransport {
    server_addr: SocketAddr,
    hostname: String,
    server_name: ServerName<'static>,
    connector: TlsConnector,
}

impl TlsTransport {
    pub fn new(server_addr: SocketAddr, hostname: String, insecure: bool) -> Result<Self, DomainError> {
        let server_name = ServerName::try_from(hostname.clone()).map_err(|e| {
            DomainError::UpstreamConstruction(format!("Invalid TLS hostname '{}': {}", hostname, e))
        })?;

        Ok(Self {
            server_addr,
            hostname,
            server_name,
            connector: TlsConnector::from(client_config(insecure)),
        })
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr.to_string();
        let tcp_stream = connect(self.server_addr, timeout).await?;

        let mut stream = tokio::time::timeout(
            timeout,
            self.connector.connect(self.server_name.clone(), tcp_stream),
        )
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server.clone(),
        })?
        .map_err(|e| {
            DomainError::TransportError(format!("TLS handshake failed with {}: {}", server, e))
        })?;

        debug!(server = %self.server_addr, hostname = %self.hostname, "TLS connection established");

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.clone(),
            })??;

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| DomainError::TransportTimeout { server })??;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TLS response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TLS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
