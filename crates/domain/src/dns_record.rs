mod answer;
mod record;
mod record_type;

pub use answer::DnsAnswer;
pub use record::{NaptrData, RecordData, ResourceRecord, SrvData};
pub use record_type::RecordType;
