//! sipdns infrastructure: DNS wire client, record cache and `QueryDispatcher` adapters
pub mod dns;
