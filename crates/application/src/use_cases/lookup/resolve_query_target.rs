use ferrous_q_domain::{fqdn, reverse_name, DomainError, RecordType};
use std::net::IpAddr;

/// Turns the lookup subject into the name that goes on the wire.
pub struct QueryTargetResolver;

impl QueryTargetResolver {
    /// Returns the canonical query name, plus `PTR` when `reverse` asks for
    /// an address-to-name lookup.
    pub fn resolve(
        name: &str,
        reverse: bool,
    ) -> Result<(String, Option<RecordType>), DomainError> {
        if !reverse {
            return Ok((fqdn(name), None));
        }

        let addr: IpAddr = name
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidAddress(name.to_string()))?;

        Ok((reverse_name(addr), Some(RecordType::PTR)))
    }
}
