//! End-to-end scenarios from the concrete query examples: decode a raw wire
//! query, run it through the pipeline, and check the encoded response.

use std::net::SocketAddr;
use std::time::Duration;

use nibblet::address::ptr_labels;
use nibblet::dns::{DnsClass, DnsFlags, DnsOpcode, DnsPacket, DnsQuestion, DnsRCode, DnsRRType, DnsRecordData};
use nibblet::pipeline::handle_query;
use nibblet::registry::{NetworkRecord, Prefix, Registry};
use nibblet::template::CompiledTemplate;
use nibblet::upstream::{UpstreamOutcome, UpstreamResolver};

struct NeverAnswers;
impl UpstreamResolver for NeverAnswers {
    fn resolve_ptr(&self, _name: &[String], _endpoint: SocketAddr, _deadline: Duration) -> UpstreamOutcome {
        UpstreamOutcome::Unavailable
    }
}

struct AlwaysRelays(Vec<String>);
impl UpstreamResolver for AlwaysRelays {
    fn resolve_ptr(&self, _name: &[String], _endpoint: SocketAddr, _deadline: Duration) -> UpstreamOutcome {
        UpstreamOutcome::Relayed(self.0.clone())
    }
}

fn test_registry(upstream: Option<SocketAddr>) -> Registry {
    Registry::new(vec![NetworkRecord {
        prefix: Prefix::new("2001:db8::".parse().unwrap(), 64).unwrap(),
        template: CompiledTemplate::compile("test-%DIGITS%.local", 16).unwrap(),
        upstream,
    }])
}

fn query_packet(qname: Vec<String>, qtype: DnsRRType) -> DnsPacket {
    DnsPacket {
        id: 0x2222,
        flags: DnsFlags {
            qr_bit: false,
            opcode: DnsOpcode::Query,
            aa_bit: false,
            tc_bit: false,
            rd_bit: true,
            ra_bit: false,
            ad_bit: false,
            cd_bit: false,
            rcode: DnsRCode::NoError,
        },
        questions: vec![DnsQuestion { qname, qtype, qclass: DnsClass::IN }],
        answers: vec![],
        nameservers: vec![],
        addl_recs: vec![],
    }
}

/// Scenario 1: PTR synthesis for `2001:db8::1234:5678:9abc:def0`.
#[test]
fn ptr_synthesis_scenario() {
    let registry = test_registry(None);
    let qname = ptr_labels("2001:db8::1234:5678:9abc:def0".parse().unwrap());
    let query = query_packet(qname, DnsRRType::PTR);
    let bytes = query.to_bytes();

    let decoded = DnsPacket::from_bytes(&bytes).expect("valid wire query");
    let response = handle_query(&decoded, &registry, &NeverAnswers);
    // The response itself is a QR=1 message, which from_bytes refuses to
    // decode as a query; encoding it is still exercised, the content is
    // checked directly on the in-memory packet.
    let response_bytes = response.to_bytes();
    assert!(response_bytes.len() >= 12);

    assert_eq!(response.id, 0x2222);
    assert_eq!(response.flags.rcode, DnsRCode::NoError);
    assert!(response.flags.qr_bit && response.flags.aa_bit);
    match &response.answers[0].record {
        DnsRecordData::PTR(target) => {
            assert_eq!(
                target,
                &vec!["test-123456789abcdef0".to_string(), "local".to_string()]
            );
        }
        other => panic!("expected PTR rdata, got {:?}", other),
    }
}

/// Scenario 2: AAAA synthesis for `test-123456789abcdef0.local`.
#[test]
fn aaaa_synthesis_scenario() {
    let registry = test_registry(None);
    let query = query_packet(
        vec!["test-123456789abcdef0".to_string(), "local".to_string()],
        DnsRRType::AAAA,
    );
    let response = handle_query(&query, &registry, &NeverAnswers);

    assert_eq!(response.flags.rcode, DnsRCode::NoError);
    match &response.answers[0].record {
        DnsRecordData::AAAA(addr) => {
            assert_eq!(addr, &"2001:db8::1234:5678:9abc:def0".parse().unwrap());
        }
        other => panic!("expected AAAA rdata, got {:?}", other),
    }
}

/// Scenario 3: PTR for an address outside any configured network.
#[test]
fn out_of_network_ptr_is_nxdomain() {
    let registry = test_registry(None);
    let qname = ptr_labels("2001:dead::1".parse().unwrap());
    let response = handle_query(&query_packet(qname, DnsRRType::PTR), &registry, &NeverAnswers);
    assert_eq!(response.flags.rcode, DnsRCode::NXDomain);
    assert!(response.answers.is_empty());
}

/// Scenario 4: AAAA query with the wrong digit count.
#[test]
fn wrong_digit_count_is_nxdomain() {
    let registry = test_registry(None);
    let qname = vec!["test-dead".to_string(), "local".to_string()];
    let response = handle_query(&query_packet(qname, DnsRRType::AAAA), &registry, &NeverAnswers);
    assert_eq!(response.flags.rcode, DnsRCode::NXDomain);
}

/// Scenario 5: a valid name queried with an unsupported QTYPE.
#[test]
fn unsupported_qtype_is_nxdomain() {
    let registry = test_registry(None);
    let qname = vec!["test-00000000123456789abcdef0".to_string(), "local".to_string()];
    let response = handle_query(&query_packet(qname, DnsRRType::MX), &registry, &NeverAnswers);
    assert_eq!(response.flags.rcode, DnsRCode::NXDomain);
}

/// Scenario 6: the upstream answers, so the local template is never consulted.
#[test]
fn upstream_relay_scenario() {
    let upstream_addr: SocketAddr = "192.0.2.53:53".parse().unwrap();
    let registry = test_registry(Some(upstream_addr));
    let qname = ptr_labels("2001:db8::1234:5678:9abc:def0".parse().unwrap());
    let relay = AlwaysRelays(vec!["named".to_string(), "example".to_string()]);
    let response = handle_query(&query_packet(qname, DnsRRType::PTR), &registry, &relay);

    assert!(response.flags.aa_bit);
    match &response.answers[0].record {
        DnsRecordData::PTR(target) => {
            assert_eq!(target, &vec!["named".to_string(), "example".to_string()]);
        }
        other => panic!("expected PTR rdata, got {:?}", other),
    }
}

/// Scenario 7: the upstream times out, so the response equals what it would
/// have been with no upstream configured at all.
#[test]
fn upstream_fallback_scenario() {
    let upstream_addr: SocketAddr = "192.0.2.53:53".parse().unwrap();
    let with_upstream = test_registry(Some(upstream_addr));
    let without_upstream = test_registry(None);
    let qname = ptr_labels("2001:db8::1234:5678:9abc:def0".parse().unwrap());

    let fallback = handle_query(&query_packet(qname.clone(), DnsRRType::PTR), &with_upstream, &NeverAnswers);
    let plain = handle_query(&query_packet(qname, DnsRRType::PTR), &without_upstream, &NeverAnswers);
    assert_eq!(fallback, plain);
}

/// Scenario 8: bytes that don't form a valid DNS header produce FORMERR.
#[test]
fn malformed_request_scenario() {
    let garbage = [0xffu8; 3];
    let err = DnsPacket::from_bytes(&garbage).unwrap_err();
    let response = err.to_response_packet();
    assert_eq!(response.flags.rcode, DnsRCode::FormError);
}
