use crate::dns::cache::RecordCache;
use sipdns_application::ports::{QueryCallback, QueryDispatcher};
use sipdns_domain::RecordType;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// Answers repeated lookups from a [`RecordCache`] before asking `inner`.
///
/// Hits complete synchronously, inside the `lookup_*` call.
pub struct CachingDispatcher {
    inner: Rc<dyn QueryDispatcher>,
    cache: Arc<RecordCache>,
}

impl CachingDispatcher {
    pub fn new(inner: Rc<dyn QueryDispatcher>, cache: Arc<RecordCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<RecordCache> {
        &self.cache
    }

    fn cached_lookup(&self, name: &str, record_type: RecordType, on_complete: QueryCallback) {
        if let Some(data) = self.cache.get(name, record_type) {
            debug!(domain = %name, record_type = %record_type, "Cache hit");
            return on_complete(data.to_result());
        }

        let cache = Arc::clone(&self.cache);
        let owned_name = name.to_string();
        self.inner.lookup(
            name,
            record_type,
            Box::new(move |result| {
                cache.insert(&owned_name, record_type, &result);
                on_complete(result);
            }),
        );
    }
}

impl QueryDispatcher for CachingDispatcher {
    fn lookup_naptr(&self, name: &str, on_complete: QueryCallback) {
        self.cached_lookup(name, RecordType::NAPTR, on_complete);
    }

    fn lookup_srv(&self, name: &str, on_complete: QueryCallback) {
        self.cached_lookup(name, RecordType::SRV, on_complete);
    }

    fn lookup_a_records(&self, name: &str, on_complete: QueryCallback) {
        self.cached_lookup(name, RecordType::A, on_complete);
    }

    fn lookup_aaaa_records(&self, name: &str, on_complete: QueryCallback) {
        self.cached_lookup(name, RecordType::AAAA, on_complete);
    }

    fn supports(&self, record_type: RecordType) -> bool {
        self.inner.supports(record_type)
    }
}
