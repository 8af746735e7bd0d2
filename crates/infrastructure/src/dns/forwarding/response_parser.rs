use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, Record};
use sipdns_domain::{
    normalize_name, DnsAnswer, DomainError, NaptrData, RecordData, ResourceRecord, SrvData,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    pub answer: DnsAnswer,
}

impl DnsResponse {
    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self.rcode,
            ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::NotImp
        )
    }

    /// Collapses the response code into what a dispatcher callback receives.
    pub fn into_result(self) -> Result<DnsAnswer, DomainError> {
        if self.is_nxdomain() {
            return Err(DomainError::NxDomain);
        }
        if self.is_server_error() {
            return Err(DomainError::ServerFailure(
                ResponseParser::rcode_to_status(self.rcode).to_string(),
            ));
        }
        if self.rcode != ResponseCode::NoError {
            return Err(DomainError::InvalidDnsResponse(format!(
                "unexpected response code {}",
                ResponseParser::rcode_to_status(self.rcode)
            )));
        }
        Ok(self.answer)
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = message.response_code();
        let truncated = message.truncated();

        let records: Vec<ResourceRecord> = message.answers().iter().filter_map(convert).collect();
        let additional: Vec<ResourceRecord> =
            message.additionals().iter().filter_map(convert).collect();
        let negative_ttl = extract_negative_ttl(message.name_servers());

        debug!(
            rcode = ?rcode,
            answers = records.len(),
            additional = additional.len(),
            negative_ttl = ?negative_ttl,
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            id: message.id(),
            rcode,
            truncated,
            answer: DnsAnswer {
                records,
                additional,
                negative_ttl,
            },
        })
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}

/// Record in the shapes the resolver consumes; anything else is skipped.
fn convert(record: &Record) -> Option<ResourceRecord> {
    let name = record.name().to_utf8();
    let ttl = record.ttl();

    let data = match record.data() {
        RData::A(a) => RecordData::A(a.0),
        RData::AAAA(aaaa) => RecordData::Aaaa(aaaa.0),
        RData::CNAME(canonical) => RecordData::Cname(normalize_name(&canonical.to_utf8())),
        RData::SRV(srv) => RecordData::Srv(SrvData {
            priority: srv.priority(),
            weight: srv.weight(),
            port: srv.port(),
            target: normalize_name(&srv.target().to_utf8()),
        }),
        RData::NAPTR(naptr) => {
            let (Some(flags), Some(service), Some(regexp)) = (
                text(naptr.flags()),
                text(naptr.services()),
                text(naptr.regexp()),
            ) else {
                debug!(name = %name, "Skipping NAPTR record with non-UTF-8 fields");
                return None;
            };
            RecordData::Naptr(NaptrData {
                order: naptr.order(),
                preference: naptr.preference(),
                flags,
                service,
                regexp,
                replacement: normalize_name(&naptr.replacement().to_utf8()),
            })
        }
        other => {
            debug!(name = %name, record_type = ?other.record_type(), "Skipping unused record");
            return None;
        }
    };

    Some(ResourceRecord::new(&name, ttl, data))
}

fn text(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(str::to_string)
}

/// Negative-caching TTL per RFC 2308: the lesser of the SOA's TTL and its MINIMUM field.
pub fn extract_negative_ttl(authority_records: &[Record]) -> Option<u32> {
    authority_records.iter().find_map(|r| {
        if let RData::SOA(soa) = r.data() {
            Some(soa.minimum().min(r.ttl()))
        } else {
            None
        }
    })
}
