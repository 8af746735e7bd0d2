//! `QueryDispatcher` adapters handed to the resolver.
//!
//! Completions are delivered on the thread that issued the lookup: the
//! network-backed dispatchers spawn with `tokio::task::spawn_local` and must
//! run inside a `LocalSet`.

pub mod builder;
pub mod caching;
pub mod system;
pub mod upstream;

pub use builder::DispatcherBuilder;
pub use caching::CachingDispatcher;
pub use system::SystemDispatcher;
pub use upstream::UpstreamDispatcher;
