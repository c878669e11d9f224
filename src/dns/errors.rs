use thiserror::Error;

use super::{DnsFlags, DnsPacket, DnsRCode};

/// An error encountered while decoding a wire-format DNS message.
///
/// Carries the partially-decoded packet (if decoding got far enough to
/// recover an ID and flags) so the caller can still build a well-formed
/// FORMERR response instead of dropping the datagram silently.
#[derive(Debug, Error)]
#[error("DNS packet had format error: {message}")]
pub struct DnsFormatError {
    message: String,
    partial: Option<DnsPacket>,
}

impl DnsFormatError {
    pub fn make_error(message: String) -> DnsFormatError {
        DnsFormatError {
            message,
            partial: None,
        }
    }

    // A partial packet should not contain answers, nameservers, or ARs in it,
    // even if they were in the query and successfully decoded.
    pub fn set_partial(&mut self, packet: DnsPacket) {
        self.partial = Some(packet);
    }

    // Return a FormError response based on the partial packet we decoded.
    // If we didn't get far enough in the decode process to have a partial
    // (not even an ID), the caller falls back to ID 0 per spec.
    pub fn get_error_response(&self) -> Option<DnsPacket> {
        match &self.partial {
            Some(packet) => {
                let mut flags = packet.flags.clone();
                flags.qr_bit = true;
                flags.aa_bit = false;
                flags.tc_bit = false;
                flags.ra_bit = false;
                flags.ad_bit = false;
                flags.rcode = DnsRCode::FormError;
                Some(DnsPacket {
                    id: packet.id,
                    flags,
                    questions: Vec::new(),
                    answers: Vec::new(),
                    nameservers: Vec::new(),
                    addl_recs: Vec::new(),
                })
            }
            None => None,
        }
    }

    /// Build the FORMERR response bytes directly, falling back to ID 0 when
    /// no partial packet was recovered (spec: "FormErr may be returned even
    /// when the query ID was not parseable, using ID 0 in that case").
    pub fn to_response_packet(&self) -> DnsPacket {
        match self.get_error_response() {
            Some(packet) => packet,
            None => DnsPacket {
                id: 0,
                flags: DnsFlags {
                    qr_bit: true,
                    opcode: super::DnsOpcode::Query,
                    aa_bit: false,
                    tc_bit: false,
                    rd_bit: false,
                    ra_bit: false,
                    ad_bit: false,
                    cd_bit: false,
                    rcode: DnsRCode::FormError,
                },
                questions: Vec::new(),
                answers: Vec::new(),
                nameservers: Vec::new(),
                addl_recs: Vec::new(),
            },
        }
    }
}
