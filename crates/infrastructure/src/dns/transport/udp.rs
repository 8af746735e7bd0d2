//! UDP transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is. A response with the TC bit set must be retried over TCP
//! by the caller.

use super::{validate_response_id, DnsTransport, TransportResponse};
use async_trait::async_trait;
use sipdns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        let bytes_sent =
            tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
                .await
                .map_err(|_| self.timeout_error())?
                .map_err(|e| {
                    DomainError::IoError(format!(
                        "Failed to send UDP query to {}: {}",
                        self.server_addr, e
                    ))
                })?;

        debug!(server = %self.server_addr, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let deadline = tokio::time::Instant::now() + timeout;

        // Datagrams from other sources or with a stale ID are discarded until the deadline.
        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| self.timeout_error())?
                    .map_err(|e| match e.kind() {
                        std::io::ErrorKind::ConnectionRefused => {
                            DomainError::TransportConnectionRefused {
                                server: self.server_addr.to_string(),
                            }
                        }
                        _ => DomainError::IoError(format!(
                            "Failed to receive UDP response from {}: {}",
                            self.server_addr, e
                        )),
                    })?;

            if from_addr != self.server_addr {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
                continue;
            }
            if let Err(e) =
                validate_response_id(message_bytes, &recv_buf[..bytes_received], self.server_addr)
            {
                warn!(error = %e, "Discarding UDP response");
                continue;
            }

            recv_buf.truncate(bytes_received);
            debug!(
                server = %self.server_addr,
                bytes_received = bytes_received,
                "UDP response received"
            );

            return Ok(TransportResponse {
                bytes: recv_buf,
                protocol_used: "UDP",
            });
        }
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_transport_binds_matching_family() {
        let v4 = UdpTransport::new("8.8.8.8:53".parse().unwrap());
        assert!(v4.bind_addr().is_ipv4());
        assert_eq!(v4.protocol_name(), "UDP");

        let v6 = UdpTransport::new("[2001:4860:4860::8888]:53".parse().unwrap());
        assert!(v6.bind_addr().is_ipv6());
    }
}
