use crate::dns::forwarding::UpstreamClient;
use sipdns_application::ports::{QueryCallback, QueryDispatcher};
use sipdns_domain::RecordType;
use std::rc::Rc;
use tracing::debug;

/// Sends every lookup to the configured recursive servers.
pub struct UpstreamDispatcher {
    client: Rc<UpstreamClient>,
}

impl UpstreamDispatcher {
    pub fn new(client: UpstreamClient) -> Self {
        Self {
            client: Rc::new(client),
        }
    }

    fn spawn(&self, name: &str, record_type: RecordType, on_complete: QueryCallback) {
        let client = Rc::clone(&self.client);
        let name = name.to_string();
        tokio::task::spawn_local(async move {
            let result = client.query(&name, record_type).await;
            debug!(
                domain = %name,
                record_type = %record_type,
                ok = result.is_ok(),
                "Upstream lookup completed"
            );
            on_complete(result);
        });
    }
}

impl QueryDispatcher for UpstreamDispatcher {
    fn lookup_naptr(&self, name: &str, on_complete: QueryCallback) {
        self.spawn(name, RecordType::NAPTR, on_complete);
    }

    fn lookup_srv(&self, name: &str, on_complete: QueryCallback) {
        self.spawn(name, RecordType::SRV, on_complete);
    }

    fn lookup_a_records(&self, name: &str, on_complete: QueryCallback) {
        self.spawn(name, RecordType::A, on_complete);
    }

    fn lookup_aaaa_records(&self, name: &str, on_complete: QueryCallback) {
        self.spawn(name, RecordType::AAAA, on_complete);
    }
}
