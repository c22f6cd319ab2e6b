//! TCP Transport for DNS queries (RFC 1035 §4.2.2)
//!
//! Each message is framed with a 2-byte big-endian length prefix. One
//! connection per exchange.

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_q_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}

pub(crate) async fn connect(
    server_addr: SocketAddr,
    timeout: Duration,
) -> Result<TcpStream, DomainError> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(server_addr))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server_addr.to_string(),
        })?
        .map_err(|e| DomainError::from_io(server_addr.to_string(), &e))?;

    stream
        .set_nodelay(true)
        .map_err(|e| DomainError::from_io(server_addr.to_string(), &e))?;

    Ok(stream)
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr.to_string();
        let mut stream = connect(self.server_addr, timeout).await?;

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.clone(),
            })??;

        debug!(
            server = %self.server_addr,
            message_len = message_bytes.len(),
            "TCP query sent"
        );

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| DomainError::TransportTimeout { server })??;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::TransportError(format!(
            "Query too large for TCP framing: {} bytes",
            message_bytes.len()
        ))
    })?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| DomainError::TransportError(format!("Failed to write length prefix: {}", e)))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| DomainError::TransportError(format!("Failed to write DNS message: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::TransportError(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to read response length: {}", e))
    })?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Response too large: {} bytes (max {})",
            response_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to read response body: {}", e))
    })?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_length_prefix_framing() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        send_with_length_prefix(&mut client, b"hello").await.unwrap();

        let mut raw = [0u8; 7];
        server.read_exact(&mut raw).await.unwrap();
        assert_eq!(&raw[..2], &[0x00, 0x05]);
        assert_eq!(&raw[2..], b"hello");
    }

    #[tokio::test]
    async fn test_read_length_prefixed_message() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        server.write_all(&[0x00, 0x03, 0xaa, 0xbb, 0xcc]).await.unwrap();

        let body = read_with_length_prefix(&mut client).await.unwrap();
        assert_eq!(body, vec![0xaa, 0xbb, 0xcc]);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Grab a free port, then close the listener so nothing accepts.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = TcpTransport::new(addr)
            .send(&[0u8; 12], Duration::from_secs(2))
            .await
            .unwrap_err();

        assert!(err.is_transport_error());
    }
}
