pub mod dns_result;

pub use dns_result::{DnsResult, ResultState, WeakDnsResult};
