use sipdns_domain::config::{ResolverConfig, TransportConfig};
use sipdns_domain::{IpFamily, Transport};

/// Local capabilities a resolution is filtered against.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    transports: Vec<TransportConfig>,
    pub max_cname_redirects: u8,
}

impl ResolverSettings {
    /// No transport supported; build up with [`ResolverSettings::with_transport`].
    /// [`ResolverSettings::default`] enables UDP, TCP and TLS on both families.
    pub fn empty() -> Self {
        Self {
            transports: Vec::new(),
            max_cname_redirects: 3,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            transports: config.transports.clone(),
            max_cname_redirects: config.max_cname_redirects,
        }
    }

    pub fn with_transport(mut self, transport: Transport, ipv4: bool, ipv6: bool) -> Self {
        self.transports.retain(|t| t.transport != transport);
        self.transports
            .push(TransportConfig::new(transport, ipv4, ipv6));
        self
    }

    pub fn with_max_cname_redirects(mut self, max: u8) -> Self {
        self.max_cname_redirects = max;
        self
    }

    /// Transport usable on at least one address family.
    pub fn supports_transport(&self, transport: Transport) -> bool {
        self.transports
            .iter()
            .any(|t| t.transport == transport && (t.ipv4 || t.ipv6))
    }

    pub fn supports(&self, transport: Transport, family: IpFamily) -> bool {
        self.transports
            .iter()
            .any(|t| t.transport == transport && t.allows(family))
    }

    /// First supported transport among UDP, TCP and TLS, for URIs that name none.
    pub fn default_plain_transport(&self) -> Option<Transport> {
        [Transport::Udp, Transport::Tcp, Transport::Tls]
            .into_iter()
            .find(|t| self.supports_transport(*t))
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}
