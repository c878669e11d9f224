use super::{
    bigendians, DnsClass, DnsFlags, DnsFormatError, DnsOpcode, DnsQuestion, DnsResourceRecord,
};

#[derive(Clone, PartialEq, Debug)]
pub struct DnsPacket {
    // DNS transaction ID is a 16 bit number. It's arbitrary when transmitted
    // and copied into the reply so the client knows which replies correspond
    // to which requests if it's asking the same DNS server multiple questions.
    pub id: u16,
    // 16 more bits for flags which tell us a lot about the DNS packet.
    pub flags: DnsFlags,
    // u16 for number of: questions (QDCOUNT), answers (ANCOUNT), nameserver
    // records (NSCOUNT), and additional records (ARCOUNT), followed by each
    // of those segments in order
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<DnsResourceRecord>,
    pub nameservers: Vec<DnsResourceRecord>,
    pub addl_recs: Vec<DnsResourceRecord>,
}

impl DnsPacket {
    /// Decode a query message, enforcing the subset of RFC 1035 this server
    /// accepts (spec §4.4): exactly one question, standard QUERY opcode,
    /// QR not set (this must be a query, not a response), class IN.
    ///
    /// On any format error, the returned `DnsFormatError` carries a partial
    /// packet (ID + best-effort flags) when at least the 12-byte header was
    /// decodable, so the caller can still answer with FORMERR instead of
    /// dropping the datagram.
    pub fn from_bytes(bytes: &[u8]) -> Result<DnsPacket, DnsFormatError> {
        if bytes.len() < 12 {
            return Err(DnsFormatError::make_error(
                "packet shorter than a DNS header".to_string(),
            ));
        }

        let id = bigendians::to_u16(&bytes[0..2]);
        let qd_count = bigendians::to_u16(&bytes[4..6]);
        let an_count = bigendians::to_u16(&bytes[6..8]);
        let ns_count = bigendians::to_u16(&bytes[8..10]);
        let ar_count = bigendians::to_u16(&bytes[10..12]);

        let blank_partial = |flags: DnsFlags| DnsPacket {
            id,
            flags,
            questions: Vec::new(),
            answers: Vec::new(),
            nameservers: Vec::new(),
            addl_recs: Vec::new(),
        };
        let default_flags = || DnsFlags {
            qr_bit: false,
            opcode: DnsOpcode::Query,
            aa_bit: false,
            tc_bit: false,
            rd_bit: false,
            ra_bit: false,
            ad_bit: false,
            cd_bit: false,
            rcode: super::DnsRCode::NoError,
        };

        let flags = DnsFlags::from_bytes(&bytes[2..4]).map_err(|mut e| {
            e.set_partial(blank_partial(default_flags()));
            e
        })?;

        if flags.qr_bit {
            let mut e =
                DnsFormatError::make_error("message is a response, not a query".to_string());
            e.set_partial(blank_partial(flags.clone()));
            return Err(e);
        }

        if flags.opcode != DnsOpcode::Query {
            let mut e = DnsFormatError::make_error(
                "unsupported opcode, only QUERY is served".to_string(),
            );
            e.set_partial(blank_partial(flags.clone()));
            return Err(e);
        }

        if qd_count != 1 {
            let mut e = DnsFormatError::make_error(format!(
                "expected exactly one question, got {}",
                qd_count
            ));
            e.set_partial(blank_partial(flags.clone()));
            return Err(e);
        }

        // The header was 12 bytes, we now begin reading the rest of the packet.
        // These components are variable length (thanks to how labels are encoded)
        let mut pos: usize = 12;
        let (question, new_pos) = DnsQuestion::from_bytes(bytes, pos).map_err(|mut e| {
            e.set_partial(blank_partial(flags.clone()));
            e
        })?;
        pos = new_pos;
        if question.qclass != DnsClass::IN {
            let mut e = DnsFormatError::make_error("only class IN is served".to_string());
            e.set_partial(blank_partial(flags.clone()));
            return Err(e);
        }
        let questions = vec![question];

        // Answers/nameservers/additional records are never meaningful on a query
        // this server accepts; decode what we can and stop at the first one we
        // can't, rather than treating extras (e.g. an OPT pseudo-RR) as fatal.
        let mut answers: Vec<DnsResourceRecord> = Vec::new();
        for _ in 0..an_count {
            match DnsResourceRecord::from_bytes(bytes, pos) {
                Ok((rr, new_pos)) => {
                    pos = new_pos;
                    answers.push(rr);
                }
                Err(_) => break,
            }
        }
        let mut nameservers: Vec<DnsResourceRecord> = Vec::new();
        for _ in 0..ns_count {
            match DnsResourceRecord::from_bytes(bytes, pos) {
                Ok((rr, new_pos)) => {
                    pos = new_pos;
                    nameservers.push(rr);
                }
                Err(_) => break,
            }
        }
        let mut addl_recs: Vec<DnsResourceRecord> = Vec::new();
        for _ in 0..ar_count {
            match DnsResourceRecord::from_bytes(bytes, pos) {
                Ok((rr, new_pos)) => {
                    pos = new_pos;
                    addl_recs.push(rr);
                }
                Err(_) => break,
            }
        }

        Ok(DnsPacket {
            id,
            flags,
            questions,
            answers,
            nameservers,
            addl_recs,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::<u8>::new();
        bytes.extend_from_slice(&bigendians::from_u16(self.id));
        bytes.extend_from_slice(&self.flags.to_bytes());
        bytes.extend_from_slice(&bigendians::from_u16(self.questions.len() as u16));
        bytes.extend_from_slice(&bigendians::from_u16(self.answers.len() as u16));
        bytes.extend_from_slice(&bigendians::from_u16(self.nameservers.len() as u16));
        bytes.extend_from_slice(&bigendians::from_u16(self.addl_recs.len() as u16));

        for question in &self.questions {
            bytes.extend_from_slice(&question.to_bytes());
        }
        for answer in &self.answers {
            bytes.extend_from_slice(&answer.to_bytes());
        }
        for nameserver in &self.nameservers {
            bytes.extend_from_slice(&nameserver.to_bytes());
        }
        for addl_rec in &self.addl_recs {
            bytes.extend_from_slice(&addl_rec.to_bytes());
        }

        bytes
    }
}
