use ferrous_q_domain::DomainError;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6) using the system resolver.
///
/// Runs while the upstream is being built, so every failure, a timeout
/// included, is an `UpstreamConstruction` error.
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);
    let lookup = tokio::net::lookup_host(target.clone());
    resolve_with(&target, timeout, lookup).await
}

async fn resolve_with<F, I>(
    target: &str,
    timeout: Duration,
    lookup: F,
) -> Result<Vec<SocketAddr>, DomainError>
where
    F: Future<Output = std::io::Result<I>>,
    I: Iterator<Item = SocketAddr>,
{
    let addrs: Vec<SocketAddr> = tokio::time::timeout(timeout, lookup)
        .await
        .map_err(|_| {
            DomainError::UpstreamConstruction(format!(
                "resolving {} timed out after {:?}",
                target, timeout
            ))
        })?
        .map_err(|e| {
            DomainError::UpstreamConstruction(format!("cannot resolve {}: {}", target, e))
        })?
        .collect();

    if addrs.is_empty() {
        return Err(DomainError::UpstreamConstruction(format!(
            "No addresses found for {}",
            target
        )));
    }

    Ok(addrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_localhost() {
        let addrs = resolve_all("localhost", 53, Duration::from_secs(5)).await.unwrap();
        assert!(addrs.iter().all(|a| a.port() == 53));
        assert!(addrs.iter().any(|a| a.ip().is_loopback()));
    }

    #[tokio::test]
    async fn test_slow_lookup_is_a_construction_error() {
        let stalled = std::future::pending::<std::io::Result<std::vec::IntoIter<SocketAddr>>>();

        let err = resolve_with("dns.example:853", Duration::from_millis(10), stalled)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UpstreamConstruction(_)));
        assert!(!err.is_transport_error());
    }

    #[tokio::test]
    async fn test_empty_lookup_is_a_construction_error() {
        let empty = async { Ok(Vec::<SocketAddr>::new().into_iter()) };

        let err = resolve_with("dns.example:53", Duration::from_secs(1), empty)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UpstreamConstruction(_)));
    }
}
