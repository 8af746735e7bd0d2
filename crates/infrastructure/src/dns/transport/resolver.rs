use sipdns_domain::DomainError;
use std::net::IpAddr;
use std::time::Duration;

/// Resolves `hostname` through the operating system resolver, keeping IPv4 and IPv6 answers.
///
/// An empty result is a successful NODATA; only failures of the lookup itself are errors.
pub async fn resolve_all(hostname: &str, timeout: Duration) -> Result<Vec<IpAddr>, DomainError> {
    // Port is required by the API and irrelevant to the answer.
    let target = format!("{}:0", hostname);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| DomainError::QueryTimeout)?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DomainError::NxDomain
            } else {
                DomainError::IoError(format!("System resolution failed for {}: {}", hostname, e))
            }
        })?;

    let mut addrs: Vec<IpAddr> = Vec::new();
    for addr in addrs_iter {
        if !addrs.contains(&addr.ip()) {
            addrs.push(addr.ip());
        }
    }
    Ok(addrs)
}
