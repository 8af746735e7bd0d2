use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid SIP URI: {0}")]
    InvalidUri(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Upstream server failure: {0}")]
    ServerFailure(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Record type {0} is not supported by this dispatcher")]
    UnsupportedRecordType(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// True for failures that say nothing about the queried name itself.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::QueryTimeout
                | DomainError::IoError(_)
                | DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
                | DomainError::TransportAllServersUnreachable
                | DomainError::ServerFailure(_)
        )
    }
}
