use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_TLS_PORT: u16 = 853;
pub const DEFAULT_QUIC_PORT: u16 = 853;
pub const DEFAULT_DOH_PATH: &str = "/dns-query";

/// Represents an upstream server address that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

/// Transport scheme and endpoint of an upstream server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp { addr: UpstreamAddr },
    Tcp { addr: UpstreamAddr },
    Tls { addr: UpstreamAddr, hostname: Arc<str> },
    Https { url: Arc<str>, hostname: Arc<str> },
    Quic { addr: UpstreamAddr, hostname: Arc<str> },
    H3 { url: Arc<str>, hostname: Arc<str> },
}

impl DnsProtocol {
    fn upstream_addr(&self) -> Option<&UpstreamAddr> {
        match self {
            DnsProtocol::Udp { addr }
            | DnsProtocol::Tcp { addr }
            | DnsProtocol::Tls { addr, .. }
            | DnsProtocol::Quic { addr, .. } => Some(addr),
            DnsProtocol::Https { .. } | DnsProtocol::H3 { .. } => None,
        }
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.upstream_addr().and_then(UpstreamAddr::socket_addr)
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            DnsProtocol::Udp { .. } => "UDP",
            DnsProtocol::Tcp { .. } => "TCP",
            DnsProtocol::Tls { .. } => "TLS",
            DnsProtocol::Https { .. } => "HTTPS",
            DnsProtocol::Quic { .. } => "QUIC",
            DnsProtocol::H3 { .. } => "H3",
        }
    }

    /// Host and port still to be looked up before a socket can be opened.
    /// URL-based protocols leave resolution to their HTTP client.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        self.upstream_addr().and_then(UpstreamAddr::unresolved_parts)
    }

    /// Creates a copy of this protocol with the given resolved `SocketAddr`.
    pub fn with_resolved_addr(&self, resolved: SocketAddr) -> Self {
        match self {
            DnsProtocol::Udp { .. } => DnsProtocol::Udp {
                addr: UpstreamAddr::Resolved(resolved),
            },
            DnsProtocol::Tcp { .. } => DnsProtocol::Tcp {
                addr: UpstreamAddr::Resolved(resolved),
            },
            DnsProtocol::Tls { hostname, .. } => DnsProtocol::Tls {
                addr: UpstreamAddr::Resolved(resolved),
                hostname: hostname.clone(),
            },
            DnsProtocol::Quic { hostname, .. } => DnsProtocol::Quic {
                addr: UpstreamAddr::Resolved(resolved),
                hostname: hostname.clone(),
            },
            DnsProtocol::Https { .. } | DnsProtocol::H3 { .. } => self.clone(),
        }
    }
}

fn invalid(s: &str, reason: impl fmt::Display) -> DomainError {
    DomainError::UpstreamConstruction(format!("invalid server '{}': {}", s, reason))
}

fn parse_port(port_str: &str) -> Option<u16> {
    port_str.parse::<u16>().ok().filter(|p| *p != 0)
}

/// Splits `host[:port]` / `[v6][:port]` into its parts; `None` port means "use the default".
fn split_host_port(s: &str) -> Result<(&str, Option<u16>), String> {
    if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']').ok_or("unterminated '['")?;
        let host = &rest[..end];
        let tail = &rest[end + 1..];
        if tail.is_empty() {
            return Ok((host, None));
        }
        let port_str = tail.strip_prefix(':').ok_or("garbage after ']'")?;
        let port = parse_port(port_str).ok_or("bad port")?;
        return Ok((host, Some(port)));
    }

    match s.rsplit_once(':') {
        Some((host, port_str)) if !host.contains(':') => {
            let port = parse_port(port_str).ok_or("bad port")?;
            Ok((host, Some(port)))
        }
        _ => Ok((s, None)),
    }
}

fn parse_upstream_addr(addr_str: &str, default_port: u16) -> Result<UpstreamAddr, String> {
    if addr_str.is_empty() {
        return Err("empty address".to_string());
    }
    if let Ok(addr) = addr_str.parse::<SocketAddr>() {
        return Ok(UpstreamAddr::Resolved(addr));
    }
    if let Ok(ip) = addr_str.parse::<IpAddr>() {
        return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, default_port)));
    }

    let (host, port) = split_host_port(addr_str)?;
    let port = port.unwrap_or(default_port);
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, port)));
    }
    if host.is_empty() || host.contains(&['/', '@', ' ', ':'][..]) {
        return Err(format!("bad host '{}'", host));
    }
    Ok(UpstreamAddr::Unresolved {
        hostname: host.into(),
        port,
    })
}

fn tls_hostname(addr_str: &str) -> Arc<str> {
    match split_host_port(addr_str) {
        Ok((host, _)) => host.into(),
        Err(_) => addr_str.into(),
    }
}

/// Splits a `scheme://authority[/path]` remainder into a full URL (with the
/// default DoH path when none is given) and the bare host.
fn parse_url(s: &str, scheme: &str, rest: &str) -> Result<(Arc<str>, Arc<str>), DomainError> {
    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };
    let (host, _) = split_host_port(authority).map_err(|e| invalid(s, e))?;
    if host.is_empty() {
        return Err(invalid(s, "missing host"));
    }
    let url: Arc<str> = if path.is_empty() || path == "/" {
        format!("{}://{}{}", scheme, authority, DEFAULT_DOH_PATH).into()
    } else {
        s.into()
    };
    Ok((url, host.into()))
}

impl FromStr for DnsProtocol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(addr_str) = s.strip_prefix("udp://") {
            let addr = parse_upstream_addr(addr_str, DEFAULT_DNS_PORT).map_err(|e| invalid(s, e))?;
            return Ok(DnsProtocol::Udp { addr });
        }
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_upstream_addr(addr_str, DEFAULT_DNS_PORT).map_err(|e| invalid(s, e))?;
            return Ok(DnsProtocol::Tcp { addr });
        }
        if let Some(rest) = s.strip_prefix("tls://") {
            let addr = parse_upstream_addr(rest, DEFAULT_TLS_PORT).map_err(|e| invalid(s, e))?;
            return Ok(DnsProtocol::Tls {
                addr,
                hostname: tls_hostname(rest),
            });
        }
        if let Some(rest) = s.strip_prefix("https://") {
            let (url, hostname) = parse_url(s, "https", rest)?;
            return Ok(DnsProtocol::Https { url, hostname });
        }
        if let Some(rest) = s.strip_prefix("quic://").or_else(|| s.strip_prefix("doq://")) {
            let addr = parse_upstream_addr(rest, DEFAULT_QUIC_PORT).map_err(|e| invalid(s, e))?;
            return Ok(DnsProtocol::Quic {
                addr,
                hostname: tls_hostname(rest),
            });
        }
        if let Some(rest) = s.strip_prefix("h3://") {
            let (url, hostname) = parse_url(s, "h3", rest)?;
            return Ok(DnsProtocol::H3 { url, hostname });
        }
        if let Some((scheme, _)) = s.split_once("://") {
            return Err(invalid(
                s,
                format!(
                    "unsupported scheme '{}'. Expected udp://, tcp://, tls://, https://, quic://, h3:// or a bare address",
                    scheme
                ),
            ));
        }

        let addr = parse_upstream_addr(s, DEFAULT_DNS_PORT).map_err(|e| invalid(s, e))?;
        Ok(DnsProtocol::Udp { addr })
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Udp { addr } => write!(f, "udp://{}", addr),
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{}", addr),
            DnsProtocol::Tls { addr, hostname } => {
                write!(f, "tls://{}:{}", hostname, addr.port())
            }
            DnsProtocol::Https { url, .. } | DnsProtocol::H3 { url, .. } => write!(f, "{}", url),
            DnsProtocol::Quic { addr, hostname } => {
                write!(f, "quic://{}:{}", hostname, addr.port())
            }
        }
    }
}
