pub mod cache;
pub mod errors;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod upstream;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use resolver::{ResolverConfig, TransportConfig};
pub use root::{CliOverrides, Config};
pub use upstream::{UpstreamBackend, UpstreamConfig};
