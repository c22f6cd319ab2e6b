use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::{create_transport, resolver::resolve_all, tcp::TcpTransport, Transport};
use async_trait::async_trait;
use ferrous_q_application::ports::{Reply, Upstream};
use ferrous_q_domain::{DnsProtocol, DomainError, Question};
use std::time::Duration;
use tracing::debug;

/// An upstream reached directly over UDP, TCP, TLS, HTTPS, QUIC or HTTP/3.
pub struct DirectUpstream {
    protocol: DnsProtocol,
    transport: Transport,
    timeout: Duration,
}

impl DirectUpstream {
    /// Parses `server`, resolves a hostname to its first address and builds
    /// the matching transport.
    pub async fn connect(server: &str, timeout: Duration, insecure: bool) -> Result<Self, DomainError> {
        let mut protocol: DnsProtocol = server.parse()?;

        let unresolved = protocol
            .unresolved_parts()
            .map(|(hostname, port)| (hostname.to_string(), port));

        if let Some((hostname, port)) = unresolved {
            let addrs = resolve_all(&hostname, port, timeout).await?;
            debug!(hostname = %hostname, resolved = %addrs[0], "upstream hostname resolved");
            protocol = protocol.with_resolved_addr(addrs[0]);
        }

        Self::from_protocol(protocol, timeout, insecure)
    }

    pub fn from_protocol(
        protocol: DnsProtocol,
        timeout: Duration,
        insecure: bool,
    ) -> Result<Self, DomainError> {
        let transport = create_transport(&protocol, insecure)?;
        Ok(Self {
            protocol,
            transport,
            timeout,
        })
    }

    async fn ask(&self, transport: &Transport, bytes: &[u8], id: u16) -> Result<Reply, DomainError> {
        let response = transport.send(bytes, self.timeout).await?;
        debug!(protocol = response.protocol_used, response_len = response.bytes.len(), "reply received");
        let message = ResponseParser::parse(&response.bytes, id)?;
        Ok(Reply::new(message))
    }
}

#[async_trait]
impl Upstream for DirectUpstream {
    fn address(&self) -> String {
        self.protocol.to_string()
    }

    async fn exchange(&self, question: &Question) -> Result<Reply, DomainError> {
        let (id, bytes) = MessageBuilder::build_query(question)?;
        let reply = self.ask(&self.transport, &bytes, id).await?;

        if let Transport::Udp(udp) = &self.transport {
            if reply.truncated() {
                debug!(server = %udp.server_addr(), qname = %question.name, "truncated UDP reply, re-asking over TCP");
                let tcp = Transport::Tcp(TcpTransport::new(udp.server_addr()));
                return self.ask(&tcp, &bytes, id).await;
            }
        }

        Ok(reply)
    }
}
