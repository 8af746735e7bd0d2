use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SIP transport protocol.
///
/// Variant order is the tie-break order used when sorting SRV candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Tls,
    Tcp,
    Udp,
    Sctp,
    Dtls,
}

impl Transport {
    pub const ALL: [Transport; 5] = [
        Transport::Tls,
        Transport::Tcp,
        Transport::Udp,
        Transport::Sctp,
        Transport::Dtls,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Tls => "TLS",
            Transport::Tcp => "TCP",
            Transport::Udp => "UDP",
            Transport::Sctp => "SCTP",
            Transport::Dtls => "DTLS",
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, Transport::Tls | Transport::Dtls)
    }

    /// Well-known port for this transport when the URI carries none.
    ///
    /// Only TCP switches to the sips port under a `sips` scheme.
    pub fn default_port(&self, sips: bool) -> u16 {
        match self {
            Transport::Tls | Transport::Dtls => 5061,
            Transport::Tcp if sips => 5061,
            Transport::Udp | Transport::Tcp | Transport::Sctp => 5060,
        }
    }

    /// Service label prepended to a domain to form the SRV query name.
    pub fn srv_prefix(&self) -> &'static str {
        match self {
            Transport::Tls => "_sips._tcp.",
            Transport::Dtls => "_sips._udp.",
            Transport::Tcp => "_sip._tcp.",
            Transport::Udp => "_sip._udp.",
            Transport::Sctp => "_sip._sctp.",
        }
    }

    pub fn srv_name(&self, domain: &str) -> String {
        format!("{}{}", self.srv_prefix(), domain)
    }

    /// Infers the transport from the service labels of an SRV owner name.
    pub fn from_srv_name(name: &str) -> Option<Transport> {
        let name = name.to_ascii_lowercase();
        if name.starts_with("_sips._tcp") {
            Some(Transport::Tls)
        } else if name.starts_with("_sips._udp") || name.contains("._dtls") {
            Some(Transport::Dtls)
        } else if name.contains("._tls") {
            Some(Transport::Tls)
        } else if name.contains("._tcp") {
            Some(Transport::Tcp)
        } else if name.contains("._udp") {
            Some(Transport::Udp)
        } else if name.contains("._sctp") {
            Some(Transport::Sctp)
        } else {
            None
        }
    }

    /// Maps a NAPTR service field (RFC 3263 §4.1) to a transport.
    pub fn from_naptr_service(service: &str) -> Option<Transport> {
        match service.to_ascii_uppercase().as_str() {
            "SIP+D2U" => Some(Transport::Udp),
            "SIP+D2T" => Some(Transport::Tcp),
            "SIP+D2S" => Some(Transport::Sctp),
            "SIPS+D2T" => Some(Transport::Tls),
            "SIPS+D2U" => Some(Transport::Dtls),
            _ => None,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(Transport::Udp),
            "tcp" => Ok(Transport::Tcp),
            "tls" => Ok(Transport::Tls),
            "sctp" => Ok(Transport::Sctp),
            "dtls" => Ok(Transport::Dtls),
            other => Err(format!("unknown transport '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    pub fn of(ip: &std::net::IpAddr) -> IpFamily {
        if ip.is_ipv4() {
            IpFamily::V4
        } else {
            IpFamily::V6
        }
    }
}
