use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} is not a valid RR type")]
    InvalidRecordType(String),

    #[error("Invalid reverse lookup address: {0}")]
    InvalidAddress(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Cannot create upstream: {0}")]
    UpstreamConstruction(String),

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Upstream query failed: {0}")]
    TransportError(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Oblivious DoH exchange failed: {0}")]
    ObliviousDoh(String),
}

impl DomainError {
    /// Failures raised while a question was on the wire.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
                | DomainError::TransportConnectionReset { .. }
                | DomainError::TransportError(_)
                | DomainError::InvalidDnsResponse(_)
                | DomainError::ObliviousDoh(_)
        )
    }

    /// Maps an I/O failure against `server` onto the matching transport variant.
    pub fn from_io(server: impl Into<String>, err: &std::io::Error) -> Self {
        let server = server.into();
        match err.kind() {
            std::io::ErrorKind::TimedOut => DomainError::TransportTimeout { server },
            std::io::ErrorKind::ConnectionRefused => {
                DomainError::TransportConnectionRefused { server }
            }
            std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted => {
                DomainError::TransportConnectionReset { server }
            }
            _ => DomainError::TransportError(format!("{}: {}", server, err)),
        }
    }
}
