use sipdns_domain::{DnsAnswer, DomainError};

/// What a cached lookup replays to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedData {
    /// Positive answer, or NODATA when `records` is empty.
    Answer(DnsAnswer),
    NxDomain,
}

impl CachedData {
    pub fn is_negative(&self) -> bool {
        match self {
            CachedData::Answer(answer) => answer.is_empty(),
            CachedData::NxDomain => true,
        }
    }

    pub fn to_result(&self) -> Result<DnsAnswer, DomainError> {
        match self {
            CachedData::Answer(answer) => Ok(answer.clone()),
            CachedData::NxDomain => Err(DomainError::NxDomain),
        }
    }
}
