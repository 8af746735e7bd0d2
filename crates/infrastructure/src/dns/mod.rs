pub mod cache;
pub mod dispatcher;
pub mod forwarding;
pub mod transport;

pub use cache::{CacheMetrics, RecordCache, RecordCacheConfig};
pub use dispatcher::{CachingDispatcher, DispatcherBuilder, SystemDispatcher, UpstreamDispatcher};
pub use forwarding::{MessageBuilder, ResponseParser, UpstreamClient};
