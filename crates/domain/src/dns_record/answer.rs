use super::record::{NaptrData, RecordData, ResourceRecord, SrvData};
use std::net::IpAddr;

/// Structured payload of one successfully completed query.
///
/// An empty `records` list is a NODATA answer. `additional` carries whatever the
/// server bundled alongside (SRV and address glue).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsAnswer {
    pub records: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
    /// Negative-caching TTL from the authority SOA, when the server sent one.
    pub negative_ttl: Option<u32>,
}

impl DnsAnswer {
    pub fn new(records: Vec<ResourceRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn with_additional(mut self, additional: Vec<ResourceRecord>) -> Self {
        self.additional = additional;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn naptr_records(&self) -> impl Iterator<Item = (&ResourceRecord, &NaptrData)> {
        self.records.iter().filter_map(|r| match &r.data {
            RecordData::Naptr(n) => Some((r, n)),
            _ => None,
        })
    }

    pub fn srv_records(&self) -> impl Iterator<Item = (&ResourceRecord, &SrvData)> {
        srv_iter(&self.records)
    }

    pub fn additional_srv_records(&self) -> impl Iterator<Item = (&ResourceRecord, &SrvData)> {
        srv_iter(&self.additional)
    }

    pub fn addresses(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.records.iter().filter_map(ResourceRecord::address)
    }

    /// Canonical name when the answer is a CNAME indirection.
    pub fn cname(&self) -> Option<&str> {
        self.records.iter().find_map(|r| match &r.data {
            RecordData::Cname(c) => Some(c.as_str()),
            _ => None,
        })
    }

    pub fn min_ttl(&self) -> Option<u32> {
        self.records.iter().map(|r| r.ttl).min()
    }
}

fn srv_iter(records: &[ResourceRecord]) -> impl Iterator<Item = (&ResourceRecord, &SrvData)> {
    records.iter().filter_map(|r| match &r.data {
        RecordData::Srv(s) => Some((r, s)),
        _ => None,
    })
}
