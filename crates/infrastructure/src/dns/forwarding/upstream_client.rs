use super::message_builder::MessageBuilder;
use super::response_parser::{DnsResponse, ResponseParser};
use crate::dns::transport::{DnsTransport, TcpTransport, UdpTransport};
use sipdns_domain::{DnsAnswer, DomainError, RecordType};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wire-format client for a fixed list of recursive servers.
///
/// Servers are tried in order. A truncated UDP answer is repeated over TCP
/// against the same server. NXDOMAIN and NOERROR answers are authoritative
/// for the query; anything else moves on to the next server.
pub struct UpstreamClient {
    servers: Vec<SocketAddr>,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        info!(
            servers = servers.len(),
            timeout_ms = timeout.as_millis() as u64,
            "Upstream DNS client created"
        );
        Self { servers, timeout }
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    pub async fn query(&self, name: &str, record_type: RecordType) -> Result<DnsAnswer, DomainError> {
        let mut last_error = DomainError::TransportAllServersUnreachable;

        for server in &self.servers {
            match self.query_server(*server, name, record_type).await {
                Ok(response) if response.is_server_error() => {
                    warn!(
                        server = %server,
                        domain = %name,
                        record_type = %record_type,
                        rcode = ResponseParser::rcode_to_status(response.rcode),
                        "Upstream server returned an error, trying next"
                    );
                    last_error = DomainError::ServerFailure(
                        ResponseParser::rcode_to_status(response.rcode).to_string(),
                    );
                }
                Ok(response) => return response.into_result(),
                Err(e) => {
                    debug!(server = %server, domain = %name, error = %e, "Upstream query failed");
                    last_error = e;
                }
            }
        }

        Err(match last_error {
            DomainError::TransportTimeout { .. }
            | DomainError::TransportConnectionRefused { .. }
            | DomainError::IoError(_)
                if self.servers.len() > 1 =>
            {
                DomainError::TransportAllServersUnreachable
            }
            other => other,
        })
    }

    async fn query_server(
        &self,
        server: SocketAddr,
        name: &str,
        record_type: RecordType,
    ) -> Result<DnsResponse, DomainError> {
        let query = MessageBuilder::build_query(name, &record_type)?;

        let udp = UdpTransport::new(server);
        let response = ResponseParser::parse(&udp.send(&query, self.timeout).await?.bytes)?;
        if !response.truncated {
            return Ok(response);
        }

        debug!(server = %server, domain = %name, "Truncated UDP response, retrying over TCP");
        let tcp = TcpTransport::new(server);
        ResponseParser::parse(&tcp.send(&query, self.timeout).await?.bytes)
    }
}
