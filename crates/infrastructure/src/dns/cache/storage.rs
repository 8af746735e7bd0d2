use super::clock::now_secs;
use super::{CacheKey, CacheMetrics, CachedData, CachedRecord};
use lru::LruCache;
use sipdns_domain::config::CacheConfig;
use sipdns_domain::{DnsAnswer, DomainError, RecordType};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RecordCacheConfig {
    pub max_entries: usize,
    pub min_ttl: u32,
    pub max_ttl: u32,
    pub negative_ttl: u32,
}

impl From<&CacheConfig> for RecordCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            min_ttl: config.min_ttl,
            max_ttl: config.max_ttl,
            negative_ttl: config.negative_ttl,
        }
    }
}

impl Default for RecordCacheConfig {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

/// Bounded LRU of DNS answers keyed by name and record type.
///
/// Expired entries are removed lazily when looked up. Lookups take an explicit
/// clock through the `*_at` variants.
pub struct RecordCache {
    entries: Mutex<LruCache<CacheKey, CachedRecord>>,
    config: RecordCacheConfig,
    metrics: CacheMetrics,
}

impl RecordCache {
    pub fn new(config: RecordCacheConfig) -> Self {
        info!(
            max_entries = config.max_entries,
            min_ttl = config.min_ttl,
            max_ttl = config.max_ttl,
            negative_ttl = config.negative_ttl,
            "Initializing DNS record cache"
        );

        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            config,
            metrics: CacheMetrics::default(),
        }
    }

    pub fn get(&self, name: &str, record_type: RecordType) -> Option<CachedData> {
        self.get_at(name, record_type, now_secs())
    }

    pub fn get_at(&self, name: &str, record_type: RecordType, now_secs: u64) -> Option<CachedData> {
        let key = CacheKey::new(name, record_type);
        let mut entries = self.lock();

        let expired = match entries.get(&key) {
            Some(record) if !record.is_expired_at_secs(now_secs) => {
                CacheMetrics::incr(&self.metrics.hits);
                return Some(record.data.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(&key);
            CacheMetrics::incr(&self.metrics.expirations);
            debug!(name = %key.name, record_type = %record_type, "Cache entry expired");
        }
        CacheMetrics::incr(&self.metrics.misses);
        None
    }

    /// Stores a completed lookup. Returns whether it was cacheable.
    pub fn insert(
        &self,
        name: &str,
        record_type: RecordType,
        result: &Result<DnsAnswer, DomainError>,
    ) -> bool {
        self.insert_at(name, record_type, result, now_secs())
    }

    pub fn insert_at(
        &self,
        name: &str,
        record_type: RecordType,
        result: &Result<DnsAnswer, DomainError>,
        now_secs: u64,
    ) -> bool {
        let Some((data, ttl)) = self.classify(result) else {
            return false;
        };
        if ttl == 0 {
            return false;
        }

        let key = CacheKey::new(name, record_type);
        debug!(
            name = %key.name,
            record_type = %record_type,
            ttl = ttl,
            negative = data.is_negative(),
            "Caching DNS answer"
        );

        let record = CachedRecord::new(data, ttl, now_secs);
        let mut entries = self.lock();
        if let Some((evicted, _)) = entries.push(key.clone(), record) {
            if evicted != key {
                CacheMetrics::incr(&self.metrics.evictions);
            }
        }
        CacheMetrics::incr(&self.metrics.insertions);
        true
    }

    fn classify(&self, result: &Result<DnsAnswer, DomainError>) -> Option<(CachedData, u32)> {
        match result {
            Ok(answer) if !answer.is_empty() => {
                let ttl = answer.min_ttl().unwrap_or(0);
                Some((
                    CachedData::Answer(answer.clone()),
                    ttl.max(self.config.min_ttl).min(self.config.max_ttl),
                ))
            }
            Ok(answer) => {
                let ttl = answer.negative_ttl.unwrap_or(self.config.negative_ttl);
                Some((
                    CachedData::Answer(answer.clone()),
                    ttl.min(self.config.max_ttl),
                ))
            }
            Err(DomainError::NxDomain) => Some((CachedData::NxDomain, self.config.negative_ttl)),
            Err(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, CachedRecord>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
