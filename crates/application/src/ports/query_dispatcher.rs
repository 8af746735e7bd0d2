use sipdns_domain::{DnsAnswer, DomainError, RecordType};

pub type QueryResult = Result<DnsAnswer, DomainError>;

/// Completion for one query. Invoked exactly once, possibly before the
/// `lookup_*` call that received it returns.
pub type QueryCallback = Box<dyn FnOnce(QueryResult)>;

/// Asynchronous DNS client seen by the resolver.
///
/// Implementations own timeout policy: a query that never completes must still
/// invoke its callback (with an error) or drop it.
pub trait QueryDispatcher {
    fn lookup_naptr(&self, name: &str, on_complete: QueryCallback);

    fn lookup_srv(&self, name: &str, on_complete: QueryCallback);

    fn lookup_a_records(&self, name: &str, on_complete: QueryCallback);

    fn lookup_aaaa_records(&self, name: &str, on_complete: QueryCallback);

    /// Record types this backend can answer. The resolver skips discovery
    /// stages whose record type is unsupported.
    fn supports(&self, _record_type: RecordType) -> bool {
        true
    }

    fn lookup(&self, name: &str, record_type: RecordType, on_complete: QueryCallback) {
        match record_type {
            RecordType::NAPTR => self.lookup_naptr(name, on_complete),
            RecordType::SRV => self.lookup_srv(name, on_complete),
            RecordType::A => self.lookup_a_records(name, on_complete),
            RecordType::AAAA => self.lookup_aaaa_records(name, on_complete),
            other => on_complete(Err(DomainError::UnsupportedRecordType(
                other.as_str().to_string(),
            ))),
        }
    }
}
