use super::{CachingDispatcher, SystemDispatcher, UpstreamDispatcher};
use crate::dns::cache::RecordCache;
use crate::dns::forwarding::UpstreamClient;
use sipdns_application::ports::QueryDispatcher;
use sipdns_domain::config::{UpstreamBackend, UpstreamConfig};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DispatcherBuilder {
    upstream: UpstreamConfig,
    cache: Option<Arc<RecordCache>>,
}

impl DispatcherBuilder {
    pub fn new(upstream: UpstreamConfig) -> Self {
        Self {
            upstream,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<RecordCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Rc<dyn QueryDispatcher> {
        info!(
            backend = self.upstream.backend.as_str(),
            servers = self.upstream.servers.len(),
            cache = self.cache.is_some(),
            "Building query dispatcher"
        );

        let timeout = Duration::from_millis(self.upstream.timeout_ms);
        let mut dispatcher: Rc<dyn QueryDispatcher> = match self.upstream.backend {
            UpstreamBackend::Upstream => Rc::new(UpstreamDispatcher::new(UpstreamClient::new(
                self.upstream.servers,
                timeout,
            ))),
            UpstreamBackend::System => Rc::new(SystemDispatcher::new(timeout)),
        };

        if let Some(cache) = self.cache {
            dispatcher = Rc::new(CachingDispatcher::new(dispatcher, cache));
        }

        dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sipdns_domain::RecordType;

    #[test]
    fn test_system_backend_reports_capabilities_through_cache() {
        let config = UpstreamConfig {
            backend: UpstreamBackend::System,
            ..UpstreamConfig::default()
        };
        let dispatcher = DispatcherBuilder::new(config)
            .with_cache(Arc::new(RecordCache::new(Default::default())))
            .build();

        assert!(!dispatcher.supports(RecordType::NAPTR));
        assert!(dispatcher.supports(RecordType::A));
    }

    #[test]
    fn test_upstream_backend_supports_discovery() {
        let dispatcher = DispatcherBuilder::new(UpstreamConfig::default()).build();
        assert!(dispatcher.supports(RecordType::NAPTR));
        assert!(dispatcher.supports(RecordType::SRV));
    }
}
