use crate::transport::{IpFamily, Transport};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// A concrete destination produced by resolution: ready for a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tuple {
    pub ip: IpAddr,
    pub port: u16,
    pub transport: Transport,
    /// Domain the candidate was resolved for; TLS peers are verified against it.
    pub target_domain: Arc<str>,
}

impl Tuple {
    pub fn new(ip: IpAddr, port: u16, transport: Transport, target_domain: Arc<str>) -> Self {
        Self {
            ip,
            port,
            transport,
            target_domain,
        }
    }

    pub fn family(&self) -> IpFamily {
        IpFamily::of(&self.ip)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.transport, self.socket_addr())
    }
}
