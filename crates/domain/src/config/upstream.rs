use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Which query backend answers the resolver's lookups.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamBackend {
    /// Wire-format client talking to `servers` directly; supports every record type.
    #[default]
    Upstream,

    /// Operating system resolver; address records only.
    System,
}

impl UpstreamBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_servers")]
    pub servers: Vec<SocketAddr>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub backend: UpstreamBackend,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            timeout_ms: default_timeout_ms(),
            backend: UpstreamBackend::default(),
        }
    }
}

fn default_servers() -> Vec<SocketAddr> {
    vec![
        SocketAddr::from(([8, 8, 8, 8], 53)),
        SocketAddr::from(([1, 1, 1, 1], 53)),
    ]
}

fn default_timeout_ms() -> u64 {
    2000
}
