use sipdns_application::ports::DnsHandler;
use sipdns_application::services::ResolverSettings;
use sipdns_application::use_cases::{DnsResult, ResultState};
use sipdns_domain::{Config, SipUri, Tuple};
use sipdns_infrastructure::dns::{DispatcherBuilder, RecordCache, RecordCacheConfig};
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info};

/// Wakes the drain loop whenever the resolver has news.
struct WakeHandler {
    notify: Arc<Notify>,
}

impl DnsHandler for WakeHandler {
    fn handle(&self, _result: &DnsResult) {
        self.notify.notify_one();
    }
}

/// Resolves `uri` to completion and returns every candidate in preference order.
///
/// Must run inside a `LocalSet`.
pub async fn run(config: &Config, uri: &SipUri) -> Vec<Tuple> {
    let cache = config.cache.enabled.then(|| {
        Arc::new(RecordCache::new(RecordCacheConfig::from(&config.cache)))
    });

    let mut builder = DispatcherBuilder::new(config.upstream.clone());
    if let Some(cache) = &cache {
        builder = builder.with_cache(Arc::clone(cache));
    }
    let dispatcher = builder.build();

    let notify = Arc::new(Notify::new());
    let handler = Rc::new(WakeHandler {
        notify: Arc::clone(&notify),
    });
    let result = DnsResult::new(
        dispatcher,
        handler,
        ResolverSettings::from_config(&config.resolver),
    );

    result.lookup(uri);

    let mut tuples = Vec::new();
    loop {
        match result.available() {
            ResultState::Available => {
                let tuple = result.next();
                debug!(tuple = %tuple, "Candidate");
                tuples.push(tuple);
            }
            ResultState::Pending => notify.notified().await,
            ResultState::Finished => break,
        }
    }

    info!(
        target_domain = %result.target(),
        candidates = tuples.len(),
        "Resolution finished"
    );
    result.destroy();

    if let Some(cache) = cache {
        let metrics = cache.metrics();
        debug!(
            entries = cache.len(),
            hits = metrics.hits.load(Ordering::Relaxed),
            misses = metrics.misses.load(Ordering::Relaxed),
            hit_rate = metrics.hit_rate(),
            "Record cache statistics"
        );
    }

    tuples
}
