use crate::errors::DomainError;
use crate::transport::Transport;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Sip,
    Sips,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
        }
    }
}

/// The parts of a SIP URI that server location depends on.
///
/// Parsing is intentionally shallow: userinfo and unknown parameters are
/// accepted and dropped, headers (`?...`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SipUri {
    pub scheme: Scheme,
    /// Host as written; IPv6 literals keep their brackets.
    pub host: String,
    pub port: Option<u16>,
    pub transport: Option<Transport>,
    pub maddr: Option<String>,
}

impl SipUri {
    pub fn new(scheme: Scheme, host: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            port: None,
            transport: None,
            maddr: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_maddr(mut self, maddr: impl Into<String>) -> Self {
        self.maddr = Some(maddr.into());
        self
    }

    pub fn is_secure(&self) -> bool {
        self.scheme == Scheme::Sips
    }

    /// Name or address to resolve: `maddr` wins for plain `sip`, brackets stripped.
    pub fn resolution_target(&self) -> String {
        let raw = match (&self.maddr, self.scheme) {
            (Some(maddr), Scheme::Sip) if !maddr.is_empty() => maddr.as_str(),
            _ => self.host.as_str(),
        };
        strip_brackets(raw).to_string()
    }

    pub fn literal_ip(&self) -> Option<IpAddr> {
        self.resolution_target().parse().ok()
    }
}

fn strip_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

impl FromStr for SipUri {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (scheme, rest) = if let Some(rest) = strip_prefix_ci(s, "sips:") {
            (Scheme::Sips, rest)
        } else if let Some(rest) = strip_prefix_ci(s, "sip:") {
            (Scheme::Sip, rest)
        } else {
            return Err(DomainError::InvalidUri(format!(
                "'{}' is not a sip: or sips: URI",
                s
            )));
        };

        let rest = rest.split('?').next().unwrap_or_default();
        let mut segments = rest.split(';');
        let hostport = segments.next().unwrap_or_default();
        let hostport = match hostport.rfind('@') {
            Some(at) => &hostport[at + 1..],
            None => hostport,
        };

        let (host, port) = split_host_port(hostport)?;
        if host.is_empty() {
            return Err(DomainError::InvalidUri(format!("'{}' has no host", s)));
        }

        let mut uri = SipUri::new(scheme, host);
        uri.port = port;

        for param in segments {
            let (name, value) = match param.split_once('=') {
                Some((n, v)) => (n.trim(), v.trim()),
                None => (param.trim(), ""),
            };
            if name.eq_ignore_ascii_case("transport") {
                let transport = value
                    .parse::<Transport>()
                    .map_err(|e| DomainError::InvalidUri(format!("{} in '{}'", e, s)))?;
                uri.transport = Some(transport);
            } else if name.eq_ignore_ascii_case("maddr") && !value.is_empty() {
                uri.maddr = Some(value.to_string());
            }
        }

        Ok(uri)
    }
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    match (s.get(..prefix.len()), s.get(prefix.len()..)) {
        (Some(head), Some(rest)) if head.eq_ignore_ascii_case(prefix) => Some(rest),
        _ => None,
    }
}

fn split_host_port(hostport: &str) -> Result<(&str, Option<u16>), DomainError> {
    let (host, port) = if hostport.starts_with('[') {
        match hostport.find(']') {
            Some(end) => {
                let host = &hostport[..=end];
                match hostport[end + 1..].strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None if end + 1 == hostport.len() => (host, None),
                    None => {
                        return Err(DomainError::InvalidUri(format!(
                            "unexpected text after IPv6 literal in '{}'",
                            hostport
                        )))
                    }
                }
            }
            None => {
                return Err(DomainError::InvalidUri(format!(
                    "unterminated IPv6 literal in '{}'",
                    hostport
                )))
            }
        }
    } else {
        match hostport.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (hostport, None),
        }
    };

    let port = port
        .map(|p| {
            p.parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| DomainError::InvalidUri(format!("invalid port '{}'", p)))
        })
        .transpose()?;

    Ok((host, port))
}

impl fmt::Display for SipUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme.as_str(), self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        if let Some(transport) = self.transport {
            write!(f, ";transport={}", transport.as_str().to_ascii_lowercase())?;
        }
        if let Some(maddr) = &self.maddr {
            write!(f, ";maddr={}", maddr)?;
        }
        Ok(())
    }
}
