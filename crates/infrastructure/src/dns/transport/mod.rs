pub mod resolver;
pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use sipdns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

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

/// Rejects a response whose DNS ID differs from the query's.
pub(crate) fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Message from {} too short to carry an ID",
            server
        )));
    }
    if query[..2] != response[..2] {
        return Err(DomainError::InvalidDnsResponse(format!(
            "DNS ID mismatch from {}: expected {:02x}{:02x}, got {:02x}{:02x}",
            server, query[0], query[1], response[0], response[1]
        )));
    }
    Ok(())
}
