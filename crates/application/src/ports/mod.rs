mod dns_handler;
mod query_dispatcher;

pub use dns_handler::DnsHandler;
pub use query_dispatcher::{QueryCallback, QueryDispatcher, QueryResult};
