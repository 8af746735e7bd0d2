pub mod clock;
pub mod data;
pub mod key;
pub mod metrics;
pub mod record;
pub mod storage;

pub use data::CachedData;
pub use key::CacheKey;
pub use metrics::CacheMetrics;
pub use record::CachedRecord;
pub use storage::{RecordCache, RecordCacheConfig};
