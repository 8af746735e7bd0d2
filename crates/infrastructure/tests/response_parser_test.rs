use hickory_proto::op::ResponseCode;
use sipdns_domain::{DomainError, RecordData, RecordType};
use sipdns_infrastructure::dns::ResponseParser;
use std::net::{IpAddr, Ipv4Addr};

mod helpers;
use helpers::*;

// ============================================================================
// answer section
// ============================================================================

#[test]
fn test_parse_naptr_answer_with_srv_and_glue() {
    let mut message = response(
        ResponseCode::NoError,
        vec![
            naptr_record("example.com", 300, 10, 20, "SIP+D2T", "_sip._tcp.example.com"),
            naptr_record("example.com", 300, 20, 10, "SIP+D2U", "_sip._udp.example.com"),
        ],
    );
    message.add_additional(srv_record(
        "_sip._tcp.example.com",
        300,
        0,
        10,
        5060,
        "sip1.example.com",
    ));
    message.add_additional(a_record("sip1.example.com", 120, [192, 0, 2, 1]));

    let parsed = ResponseParser::parse(&to_wire(&message)).unwrap();
    let answer = parsed.into_result().unwrap();

    let naptr: Vec<_> = answer.naptr_records().map(|(_, n)| n.clone()).collect();
    assert_eq!(naptr.len(), 2);
    assert_eq!(naptr[0].order, 10);
    assert_eq!(naptr[0].preference, 20);
    assert_eq!(naptr[0].flags, "s");
    assert_eq!(naptr[0].service, "SIP+D2T");
    assert_eq!(naptr[0].replacement, "_sip._tcp.example.com");

    let (srv_rr, srv) = answer.additional_srv_records().next().unwrap();
    assert_eq!(srv_rr.name, "_sip._tcp.example.com");
    assert_eq!(srv.port, 5060);
    assert_eq!(srv.target, "sip1.example.com");

    assert_eq!(answer.additional.len(), 2);
    assert_eq!(answer.min_ttl(), Some(300));
}

#[test]
fn test_parse_addresses_and_cname() {
    let message = response(
        ResponseCode::NoError,
        vec![
            cname_record("sip.example.com", 60, "edge.example.net"),
            a_record("edge.example.net", 30, [198, 51, 100, 7]),
            aaaa_record("edge.example.net", 30, "2001:db8::7"),
        ],
    );

    let answer = ResponseParser::parse(&to_wire(&message))
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(answer.cname(), Some("edge.example.net"));
    let addrs: Vec<IpAddr> = answer.addresses().collect();
    assert_eq!(
        addrs,
        vec![
            IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7)),
            "2001:db8::7".parse::<IpAddr>().unwrap(),
        ]
    );
    assert_eq!(answer.min_ttl(), Some(30));
}

#[test]
fn test_root_srv_target_parses_as_empty_name() {
    let message = response(
        ResponseCode::NoError,
        vec![srv_record("_sip._udp.example.com", 300, 0, 0, 0, ".")],
    );

    let answer = ResponseParser::parse(&to_wire(&message))
        .unwrap()
        .into_result()
        .unwrap();

    let (_, srv) = answer.srv_records().next().unwrap();
    assert!(sipdns_domain::is_root_name(&srv.target));
}

#[test]
fn test_unused_record_types_are_skipped() {
    let message = response(
        ResponseCode::NoError,
        vec![
            mx_record("example.com", 300),
            a_record("example.com", 300, [192, 0, 2, 9]),
        ],
    );

    let answer = ResponseParser::parse(&to_wire(&message))
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(answer.records.len(), 1);
    assert_eq!(answer.records[0].record_type(), RecordType::A);
    assert!(matches!(answer.records[0].data, RecordData::A(_)));
}

// ============================================================================
// response codes and negative answers
// ============================================================================

#[test]
fn test_nxdomain_maps_to_error() {
    let message = response(ResponseCode::NXDomain, vec![]);
    let parsed = ResponseParser::parse(&to_wire(&message)).unwrap();

    assert!(parsed.is_nxdomain());
    assert_eq!(parsed.into_result(), Err(DomainError::NxDomain));
}

#[test]
fn test_servfail_maps_to_server_failure() {
    let message = response(ResponseCode::ServFail, vec![]);
    let result = ResponseParser::parse(&to_wire(&message))
        .unwrap()
        .into_result();

    assert_eq!(result, Err(DomainError::ServerFailure("SERVFAIL".to_string())));
}

#[test]
fn test_nodata_carries_negative_ttl_from_soa() {
    let mut message = response(ResponseCode::NoError, vec![]);
    message.add_name_server(soa_record("example.com", 300, 900));

    let answer = ResponseParser::parse(&to_wire(&message))
        .unwrap()
        .into_result()
        .unwrap();

    assert!(answer.is_empty());
    assert_eq!(answer.negative_ttl, Some(300));
}

#[test]
fn test_negative_ttl_uses_soa_record_ttl_when_lower() {
    let mut message = response(ResponseCode::NoError, vec![]);
    message.add_name_server(soa_record("example.com", 3600, 120));

    let answer = ResponseParser::parse(&to_wire(&message))
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(answer.negative_ttl, Some(120));
}

#[test]
fn test_truncated_flag_is_reported() {
    let mut message = response(ResponseCode::NoError, vec![]);
    message.set_truncated(true);

    let parsed = ResponseParser::parse(&to_wire(&message)).unwrap();
    assert!(parsed.truncated);
    assert_eq!(parsed.id, 0x4242);
}

#[test]
fn test_garbage_is_invalid_response() {
    let result = ResponseParser::parse(&[0x00, 0x01, 0x02]);
    assert!(matches!(result, Err(DomainError::InvalidDnsResponse(_))));
}
