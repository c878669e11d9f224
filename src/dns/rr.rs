use super::{bigendians, names, DnsClass, DnsFormatError, DnsRRType, DnsRecordData};

#[derive(Clone, PartialEq, Debug)]
pub struct DnsResourceRecord {
    // See comment in DnsQuestion struct above, the first three fields here are
    // nearly identical
    pub name: Vec<String>,
    pub rr_type: DnsRRType,
    pub class: DnsClass,
    // Unsigned 32 bit integer signifying the amount of time the client can
    // cache this answer for. 0 means not to cache. Note that RFC 1035 states
    // this is signed in some sections, this is corrected in errata.
    pub ttl: u32,
    // Record length: tells us how long the data in record data is
    pub rd_length: u16,
    // Record data, interpreted per rr_type.
    pub record: DnsRecordData,
}

impl DnsResourceRecord {
    // XXX EDNS OPT records are special and for now usually cause this program to error out.
    // Specifically, OPT rewrites what the "class" field should contain; it becomes the
    // UDP payload size instead of the Class ENUM. We don't accept OPT records at all; this
    // server never emits or expects EDNS(0) (see spec Non-goals).
    pub fn from_bytes(
        packet_bytes: &[u8],
        mut pos: usize,
    ) -> Result<(DnsResourceRecord, usize), DnsFormatError> {
        let (name, new_pos) = names::deserialize_name(packet_bytes, pos)?;
        if new_pos + 10 > packet_bytes.len() {
            return Err(DnsFormatError::make_error(
                "end of packet parsing resource record".to_string(),
            ));
        }
        let rrtype_num = bigendians::to_u16(&packet_bytes[new_pos..new_pos + 2]);
        let class_num = bigendians::to_u16(&packet_bytes[new_pos + 2..new_pos + 4]);
        let ttl = bigendians::to_u32(&packet_bytes[new_pos + 4..new_pos + 8]);
        let rd_length = bigendians::to_u16(&packet_bytes[new_pos + 8..new_pos + 10]);
        pos = new_pos + 10;

        if pos + (rd_length as usize) > packet_bytes.len() {
            return Err(DnsFormatError::make_error(
                "resource record data runs past end of packet".to_string(),
            ));
        }

        let rr_type = match num::FromPrimitive::from_u16(rrtype_num) {
            Some(x) => Ok(x),
            None => Err(DnsFormatError::make_error(format!(
                "invalid rrtype value: {:x}",
                rrtype_num
            ))),
        }?;
        let class = match num::FromPrimitive::from_u16(class_num) {
            Some(x) => Ok(x),
            None => Err(DnsFormatError::make_error(format!(
                "invalid class value: {:x}",
                class_num
            ))),
        }?;

        let (record, new_pos) = DnsRecordData::from_bytes(packet_bytes, pos, &rr_type, rd_length)?;
        pos = new_pos;

        let rr = DnsResourceRecord {
            name,
            rr_type,
            class,
            ttl,
            rd_length,
            record,
        };

        Ok((rr, pos))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.append(&mut names::serialize_name(&self.name));
        bytes.extend_from_slice(&bigendians::from_u16(self.rr_type.to_owned() as u16));
        bytes.extend_from_slice(&bigendians::from_u16(self.class.to_owned() as u16));
        bytes.extend_from_slice(&bigendians::from_u32(self.ttl));
        bytes.extend_from_slice(&bigendians::from_u16(self.rd_length));
        bytes.extend_from_slice(&self.record.to_bytes());

        bytes
    }

    /// Build a PTR answer record naming the question, per spec §4.4: TTL 60,
    /// class IN, uncompressed label RDATA.
    pub fn ptr_answer(qname: Vec<String>, target: Vec<String>) -> DnsResourceRecord {
        let rdata = DnsRecordData::PTR(target);
        DnsResourceRecord {
            name: qname,
            rr_type: DnsRRType::PTR,
            class: DnsClass::IN,
            ttl: 60,
            rd_length: rdata.to_bytes().len() as u16,
            record: rdata,
        }
    }

    /// Build an AAAA answer record, per spec §4.4: TTL 60, class IN, 16 raw
    /// address octets as RDATA.
    pub fn aaaa_answer(qname: Vec<String>, addr: std::net::Ipv6Addr) -> DnsResourceRecord {
        DnsResourceRecord {
            name: qname,
            rr_type: DnsRRType::AAAA,
            class: DnsClass::IN,
            ttl: 60,
            rd_length: 16,
            record: DnsRecordData::AAAA(addr),
        }
    }
}
