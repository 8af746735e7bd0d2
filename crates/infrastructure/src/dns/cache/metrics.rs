use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

#[derive(Default, Debug)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub insertions: AtomicU64,
    pub evictions: AtomicU64,
    /// Entries found expired on lookup and removed.
    pub expirations: AtomicU64,
}

impl CacheMetrics {
    /// Percentage of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(AtomicOrdering::Relaxed) as f64;
        let total = hits + self.misses.load(AtomicOrdering::Relaxed) as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }

    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, AtomicOrdering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let metrics = CacheMetrics::default();
        assert_eq!(metrics.hit_rate(), 0.0);

        metrics.hits.store(3, AtomicOrdering::Relaxed);
        metrics.misses.store(1, AtomicOrdering::Relaxed);
        assert_eq!(metrics.hit_rate(), 75.0);
    }
}
