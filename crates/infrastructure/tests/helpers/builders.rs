#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NAPTR, SOA, SRV};
use hickory_proto::rr::{Name, RData, Record};
use sipdns_infrastructure::dns::MessageBuilder;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub fn name(s: &str) -> Name {
    MessageBuilder::fqdn(s).unwrap()
}

pub fn a_record(owner: &str, ttl: u32, ip: [u8; 4]) -> Record {
    Record::from_rdata(name(owner), ttl, RData::A(A::from(Ipv4Addr::from(ip))))
}

pub fn aaaa_record(owner: &str, ttl: u32, ip: &str) -> Record {
    let ip = Ipv6Addr::from_str(ip).unwrap();
    Record::from_rdata(name(owner), ttl, RData::AAAA(AAAA::from(ip)))
}

pub fn cname_record(owner: &str, ttl: u32, canonical: &str) -> Record {
    Record::from_rdata(name(owner), ttl, RData::CNAME(CNAME(name(canonical))))
}

pub fn srv_record(owner: &str, ttl: u32, priority: u16, weight: u16, port: u16, target: &str) -> Record {
    let target = if target == "." { Name::root() } else { name(target) };
    Record::from_rdata(
        name(owner),
        ttl,
        RData::SRV(SRV::new(priority, weight, port, target)),
    )
}

pub fn naptr_record(
    owner: &str,
    ttl: u32,
    order: u16,
    preference: u16,
    service: &str,
    replacement: &str,
) -> Record {
    Record::from_rdata(
        name(owner),
        ttl,
        RData::NAPTR(NAPTR::new(
            order,
            preference,
            b"s".to_vec().into_boxed_slice(),
            service.as_bytes().to_vec().into_boxed_slice(),
            Vec::new().into_boxed_slice(),
            name(replacement),
        )),
    )
}

pub fn soa_record(zone: &str, minimum: u32, record_ttl: u32) -> Record {
    let mname = name(&format!("ns1.{}", zone));
    let rname = name(&format!("hostmaster.{}", zone));
    let soa = SOA::new(mname, rname, 1, 3600, 900, 604800, minimum);
    Record::from_rdata(name(zone), record_ttl, RData::SOA(soa))
}

pub fn mx_record(owner: &str, ttl: u32) -> Record {
    Record::from_rdata(
        name(owner),
        ttl,
        RData::MX(MX::new(10, name(&format!("mail.{}", owner)))),
    )
}

/// Empty NOERROR response echoing the query's ID and question.
pub fn response_to(query: &Message) -> Message {
    let mut response = Message::new(query.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(true);
    response.set_recursion_available(true);
    for q in query.queries() {
        response.add_query(q.clone());
    }
    response
}

pub fn response(rcode: ResponseCode, answers: Vec<Record>) -> Message {
    let mut message = Message::new(0x4242, MessageType::Response, OpCode::Query);
    message.set_response_code(rcode);
    for record in answers {
        message.add_answer(record);
    }
    message
}

pub fn to_wire(message: &Message) -> Vec<u8> {
    MessageBuilder::serialize_message(message).unwrap()
}
