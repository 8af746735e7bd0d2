use crate::transport::{IpFamily, Transport};
use serde::{Deserialize, Serialize};

/// One locally supported transport and the address families it may use.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TransportConfig {
    pub transport: Transport,

    #[serde(default = "default_true")]
    pub ipv4: bool,

    #[serde(default = "default_true")]
    pub ipv6: bool,
}

impl TransportConfig {
    pub fn new(transport: Transport, ipv4: bool, ipv6: bool) -> Self {
        Self {
            transport,
            ipv4,
            ipv6,
        }
    }

    pub fn allows(&self, family: IpFamily) -> bool {
        match family {
            IpFamily::V4 => self.ipv4,
            IpFamily::V6 => self.ipv6,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default = "default_transports")]
    pub transports: Vec<TransportConfig>,

    /// How many CNAME indirections a NAPTR lookup may follow.
    #[serde(default = "default_max_cname_redirects")]
    pub max_cname_redirects: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            transports: default_transports(),
            max_cname_redirects: default_max_cname_redirects(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_transports() -> Vec<TransportConfig> {
    vec![
        TransportConfig::new(Transport::Udp, true, true),
        TransportConfig::new(Transport::Tcp, true, true),
        TransportConfig::new(Transport::Tls, true, true),
    ]
}

fn default_max_cname_redirects() -> u8 {
    3
}
