//! The query pipeline (spec §4.5, component C5): classifies a decoded
//! question, orchestrates upstream delegation, synthesizes answers, and
//! assembles the response packet. This is the one place C1-C4 and the
//! upstream collaborator meet.

use std::time::Duration;

use crate::address::{addr_from_digits, addr_from_ptr, host_digits, ptr_labels};
use crate::dns::{
    DnsFlags, DnsOpcode, DnsPacket, DnsQuestion, DnsRCode, DnsRRType, DnsResourceRecord,
};
use crate::registry::Registry;
use crate::upstream::{UpstreamOutcome, UpstreamResolver};

/// How long to wait for an upstream PTR reply before falling back to local
/// synthesis (spec §5: "several seconds is typical").
pub const UPSTREAM_DEADLINE: Duration = Duration::from_secs(3);

/// Process one decoded query against `registry`, consulting `upstream` for
/// PTR delegation where configured. Never panics; every branch of the
/// pipeline produces a well-formed response packet (spec §7: "the core
/// never crashes a request handler").
pub fn handle_query(query: &DnsPacket, registry: &Registry, upstream: &dyn UpstreamResolver) -> DnsPacket {
    let question = &query.questions[0];

    let (rcode, answer) = match question.qtype {
        DnsRRType::PTR => handle_ptr(question, registry, upstream),
        DnsRRType::AAAA => handle_aaaa(question, registry),
        _ => (DnsRCode::NXDomain, None),
    };

    respond(query, question, rcode, answer)
}

fn handle_ptr(
    question: &DnsQuestion,
    registry: &Registry,
    upstream: &dyn UpstreamResolver,
) -> (DnsRCode, Option<DnsResourceRecord>) {
    let addr = match addr_from_ptr(&question.qname) {
        Ok(addr) => addr,
        Err(_) => return (DnsRCode::NXDomain, None),
    };

    let network = match registry.find_by_addr(addr) {
        Some(network) => network,
        None => return (DnsRCode::NXDomain, None),
    };

    if let Some(endpoint) = network.upstream {
        match upstream.resolve_ptr(&question.qname, endpoint, UPSTREAM_DEADLINE) {
            UpstreamOutcome::Relayed(target) => {
                let rr = DnsResourceRecord::ptr_answer(question.qname.clone(), target);
                return (DnsRCode::NoError, Some(rr));
            }
            UpstreamOutcome::Unavailable => {}
        }
    }

    let digits = match host_digits(addr, &network.prefix) {
        Ok(digits) => digits,
        Err(_) => return (DnsRCode::NXDomain, None),
    };
    let target = network.template.synthesize(&digits);
    let rr = DnsResourceRecord::ptr_answer(question.qname.clone(), target);
    (DnsRCode::NoError, Some(rr))
}

fn handle_aaaa(question: &DnsQuestion, registry: &Registry) -> (DnsRCode, Option<DnsResourceRecord>) {
    let (network, digits) = match registry.find_by_name(&question.qname) {
        Some(found) => found,
        None => return (DnsRCode::NXDomain, None),
    };

    let addr = match addr_from_digits(&digits, &network.prefix) {
        Ok(addr) => addr,
        Err(_) => return (DnsRCode::NXDomain, None),
    };

    let rr = DnsResourceRecord::aaaa_answer(question.qname.clone(), addr);
    (DnsRCode::NoError, Some(rr))
}

fn respond(
    query: &DnsPacket,
    question: &DnsQuestion,
    rcode: DnsRCode,
    answer: Option<DnsResourceRecord>,
) -> DnsPacket {
    let flags = DnsFlags {
        qr_bit: true,
        opcode: DnsOpcode::Query,
        aa_bit: true,
        tc_bit: false,
        rd_bit: query.flags.rd_bit,
        ra_bit: false,
        ad_bit: false,
        cd_bit: false,
        rcode,
    };

    let mut packet = DnsPacket {
        id: query.id,
        flags,
        questions: vec![question.clone()],
        answers: answer.into_iter().collect(),
        nameservers: Vec::new(),
        addl_recs: Vec::new(),
    };

    // Spec §4.4: a synthesized reply must fit the 512-byte UDP budget; if it
    // doesn't, truncate instead of emitting an oversized datagram.
    if packet.to_bytes().len() > 512 {
        packet.answers.clear();
        packet.flags.tc_bit = true;
    }

    packet
}
