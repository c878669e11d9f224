//! The upstream-delegation sub-protocol (spec §4.5, §5): a short-lived UDP
//! round trip to an operator-configured nameserver, consulted for PTR
//! queries before falling back to local synthesis. Grounded on the
//! teacher's recursive resolver, which opens an ephemeral socket per query
//! and decodes the reply with the same wire codec used for serving.

use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::random;

use crate::dns::{DnsClass, DnsFlags, DnsOpcode, DnsPacket, DnsQuestion, DnsRCode, DnsRRType};

/// Outcome of consulting the upstream for a PTR query (spec §4.5 step 3):
/// everything other than a clean NOERROR reply with at least one PTR answer
/// is treated identically, as "fall through to local synthesis."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// Upstream returned NOERROR with at least one PTR RR; carries that
    /// answer's target labels, to be relayed verbatim.
    Relayed(Vec<String>),
    /// Timeout, socket error, malformed reply, or NXDOMAIN/empty NOERROR.
    Unavailable,
}

/// The collaborator contract C5 consults for PTR delegation. A production
/// implementation speaks real UDP DNS; tests substitute a fake.
pub trait UpstreamResolver {
    fn resolve_ptr(&self, name: &[String], endpoint: SocketAddr, deadline: Duration) -> UpstreamOutcome;
}

/// Sends the delegated PTR query over UDP from a fresh ephemeral socket,
/// bounded by `deadline`. Closed on completion; no connection pooling.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpUpstreamResolver;

impl UpstreamResolver for UdpUpstreamResolver {
    fn resolve_ptr(&self, name: &[String], endpoint: SocketAddr, deadline: Duration) -> UpstreamOutcome {
        match query_upstream(name, endpoint, deadline) {
            Ok(Some(target)) => UpstreamOutcome::Relayed(target),
            Ok(None) => UpstreamOutcome::Unavailable,
            Err(e) => {
                warn!("upstream query to {} failed: {}", endpoint, e);
                UpstreamOutcome::Unavailable
            }
        }
    }
}

/// Appends the literal label `upstream` to `qname`, per spec §4.5/§9: a
/// protocol-level cue so the operator's upstream nameserver configuration
/// can distinguish delegated queries from loops back to this server.
pub fn delegated_query_name(qname: &[String]) -> Vec<String> {
    let mut delegated = qname.to_vec();
    delegated.push("upstream".to_string());
    delegated
}

fn query_upstream(
    qname: &[String],
    endpoint: SocketAddr,
    deadline: Duration,
) -> Result<Option<Vec<String>>, std::io::Error> {
    let delegated_name = delegated_query_name(qname);
    let id = random::<u16>();
    let packet = DnsPacket {
        id,
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
        questions: vec![DnsQuestion {
            qname: delegated_name,
            qtype: DnsRRType::PTR,
            qclass: DnsClass::IN,
        }],
        answers: vec![],
        nameservers: vec![],
        addl_recs: vec![],
    };

    let local_addr: SocketAddr = match endpoint {
        SocketAddr::V4(_) => "0.0.0.0:0".parse().unwrap(),
        SocketAddr::V6(_) => "[::]:0".parse().unwrap(),
    };
    let socket = UdpSocket::bind(local_addr)?;
    socket.connect(endpoint)?;
    socket.set_read_timeout(Some(deadline))?;

    let start = Instant::now();
    socket.send(&packet.to_bytes())?;

    let mut buf = [0u8; 2048];
    let amt = match socket.recv(&mut buf) {
        Ok(amt) => amt,
        Err(e) => {
            debug!("upstream {} did not answer within {:?}", endpoint, start.elapsed());
            return Err(e);
        }
    };

    let reply = match DnsPacket::from_bytes(&buf[..amt]) {
        Ok(reply) => reply,
        Err(_) => return Ok(None),
    };

    if reply.id != id || reply.flags.rcode != DnsRCode::NoError {
        return Ok(None);
    }

    for rr in &reply.answers {
        if let crate::dns::DnsRecordData::PTR(target) = &rr.record {
            return Ok(Some(target.clone()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegated_query_name_appends_upstream_label() {
        let qname = vec!["a".to_string(), "ip6".to_string(), "arpa".to_string()];
        let delegated = delegated_query_name(&qname);
        assert_eq!(
            delegated,
            vec!["a".to_string(), "ip6".to_string(), "arpa".to_string(), "upstream".to_string()]
        );
    }

    struct FixedResolver(UpstreamOutcome);

    impl UpstreamResolver for FixedResolver {
        fn resolve_ptr(&self, _name: &[String], _endpoint: SocketAddr, _deadline: Duration) -> UpstreamOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn trait_object_is_usable_with_a_fake() {
        let resolver: Box<dyn UpstreamResolver> =
            Box::new(FixedResolver(UpstreamOutcome::Relayed(vec!["named".to_string(), "example".to_string()])));
        let outcome = resolver.resolve_ptr(&[], "127.0.0.1:53".parse().unwrap(), Duration::from_secs(1));
        assert_eq!(
            outcome,
            UpstreamOutcome::Relayed(vec!["named".to_string(), "example".to_string()])
        );
    }
}
