use super::RecordType;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvData {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaptrData {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub service: String,
    pub regexp: String,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(String),
    Srv(SrvData),
    Naptr(NaptrData),
}

/// One resource record, already decoded into the shapes the resolver consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Owner name, normalized.
    pub name: String,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: &str, ttl: u32, data: RecordData) -> Self {
        Self {
            name: crate::dns_name::normalize_name(name),
            ttl,
            data,
        }
    }

    pub fn a(name: &str, ttl: u32, addr: Ipv4Addr) -> Self {
        Self::new(name, ttl, RecordData::A(addr))
    }

    pub fn aaaa(name: &str, ttl: u32, addr: Ipv6Addr) -> Self {
        Self::new(name, ttl, RecordData::Aaaa(addr))
    }

    pub fn cname(name: &str, ttl: u32, canonical: &str) -> Self {
        Self::new(
            name,
            ttl,
            RecordData::Cname(crate::dns_name::normalize_name(canonical)),
        )
    }

    pub fn srv(name: &str, ttl: u32, priority: u16, weight: u16, port: u16, target: &str) -> Self {
        Self::new(
            name,
            ttl,
            RecordData::Srv(SrvData {
                priority,
                weight,
                port,
                target: crate::dns_name::normalize_name(target),
            }),
        )
    }

    pub fn naptr(
        name: &str,
        ttl: u32,
        order: u16,
        preference: u16,
        service: &str,
        replacement: &str,
    ) -> Self {
        Self::new(
            name,
            ttl,
            RecordData::Naptr(NaptrData {
                order,
                preference,
                flags: "s".to_string(),
                service: service.to_string(),
                regexp: String::new(),
                replacement: crate::dns_name::normalize_name(replacement),
            }),
        )
    }

    pub fn record_type(&self) -> RecordType {
        match self.data {
            RecordData::A(_) => RecordType::A,
            RecordData::Aaaa(_) => RecordType::AAAA,
            RecordData::Cname(_) => RecordType::CNAME,
            RecordData::Srv(_) => RecordType::SRV,
            RecordData::Naptr(_) => RecordType::NAPTR,
        }
    }

    pub fn address(&self) -> Option<IpAddr> {
        match self.data {
            RecordData::A(a) => Some(IpAddr::V4(a)),
            RecordData::Aaaa(a) => Some(IpAddr::V6(a)),
            _ => None,
        }
    }
}
