//! sipdns domain layer
pub mod config;
pub mod dns_name;
pub mod dns_record;
pub mod errors;
pub mod sip_uri;
pub mod transport;
pub mod tuple;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_name::{is_root_name, normalize_name};
pub use dns_record::{DnsAnswer, NaptrData, RecordData, RecordType, ResourceRecord, SrvData};
pub use errors::DomainError;
pub use sip_uri::{Scheme, SipUri};
pub use transport::{IpFamily, Transport};
pub use tuple::Tuple;
