use crate::dns::transport::resolver::resolve_all;
use sipdns_application::ports::{QueryCallback, QueryDispatcher};
use sipdns_domain::{DnsAnswer, DomainError, IpFamily, RecordType, ResourceRecord};
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info};

/// The OS resolver exposes no TTL, so answers are never cached by TTL.
const SYSTEM_ANSWER_TTL: u32 = 0;

/// Address lookups through the operating system resolver.
///
/// NAPTR and SRV are not available, so the resolver goes straight to host
/// lookups on default ports.
pub struct SystemDispatcher {
    timeout: Duration,
}

impl SystemDispatcher {
    pub fn new(timeout: Duration) -> Self {
        info!(timeout_ms = timeout.as_millis() as u64, "Using system resolver");
        Self { timeout }
    }

    fn spawn(&self, name: &str, family: IpFamily, on_complete: QueryCallback) {
        let timeout = self.timeout;
        let name = name.to_string();
        tokio::task::spawn_local(async move {
            let result = resolve_all(&name, timeout)
                .await
                .map(|addrs| to_answer(&name, family, &addrs));
            debug!(domain = %name, family = ?family, ok = result.is_ok(), "System lookup completed");
            on_complete(result);
        });
    }
}

pub(crate) fn to_answer(name: &str, family: IpFamily, addrs: &[IpAddr]) -> DnsAnswer {
    let records = addrs
        .iter()
        .filter(|ip| IpFamily::of(ip) == family)
        .map(|ip| match ip {
            IpAddr::V4(v4) => ResourceRecord::a(name, SYSTEM_ANSWER_TTL, *v4),
            IpAddr::V6(v6) => ResourceRecord::aaaa(name, SYSTEM_ANSWER_TTL, *v6),
        })
        .collect();
    DnsAnswer::new(records)
}

impl QueryDispatcher for SystemDispatcher {
    fn lookup_naptr(&self, _name: &str, on_complete: QueryCallback) {
        on_complete(Err(DomainError::UnsupportedRecordType(
            RecordType::NAPTR.as_str().to_string(),
        )));
    }

    fn lookup_srv(&self, _name: &str, on_complete: QueryCallback) {
        on_complete(Err(DomainError::UnsupportedRecordType(
            RecordType::SRV.as_str().to_string(),
        )));
    }

    fn lookup_a_records(&self, name: &str, on_complete: QueryCallback) {
        self.spawn(name, IpFamily::V4, on_complete);
    }

    fn lookup_aaaa_records(&self, name: &str, on_complete: QueryCallback) {
        self.spawn(name, IpFamily::V6, on_complete);
    }

    fn supports(&self, record_type: RecordType) -> bool {
        matches!(record_type, RecordType::A | RecordType::AAAA)
    }
}
