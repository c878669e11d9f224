use super::DnsFormatError;

// Functions for handling DNS names

// Unlike the other functions, `bytes` here must be the WHOLE dns packet,
// because labels can contain pointers to back earlier in the packet.
pub fn deserialize_name(
    bytes: &[u8],
    start: usize,
) -> Result<(Vec<String>, usize), DnsFormatError> {
    // Pointers can only ever point backwards (RFC 1035 4.1.4), so bounding the
    // number of pointer hops by the packet length is enough to rule out loops
    // without tracking visited offsets.
    let max_hops = bytes.len() + 1;
    let mut hops = 0;
    let mut labels = Vec::new();
    let mut pos = start;
    let packet_len = bytes.len();
    loop {
        // This check catches two separate cases: the case where the last label we read was the end
        // of the packet, but was not the root label (so we didn't return), and the case where a
        // pointer jumped us beyond the end of the packet
        if pos >= packet_len {
            return Err(DnsFormatError::make_error(
                "reached end of packet while parsing label or label pointer jumped beyond packet"
                    .to_string(),
            ));
        }
        let len_byte = bytes[pos];
        // If the length begins with the bits 11, it is a pointer
        // If it begins with the bits 00, it is a length
        // Otherwise, it is invalid
        match (len_byte >> 6) & 0b11u8 {
            0b11 => {
                hops += 1;
                if hops > max_hops {
                    return Err(DnsFormatError::make_error(
                        "label pointer loop detected".to_string(),
                    ));
                }
                // We're about to read two bytes, so we need to check that the next byte is also
                // valid
                if pos + 1 >= packet_len {
                    return Err(DnsFormatError::make_error(
                        "unexpected end of packet at label pointer start".to_string(),
                    ));
                }
                // The pointer includes the lower 6 bits of the "length" and
                // the entirety of the next byte
                let pointer_start: usize =
                    (((len_byte & 0b111111u8) as usize) << 8) + (bytes[pos + 1] as usize);
                if pointer_start >= pos {
                    // A pointer must point strictly backwards; forward/self pointers are
                    // the other shape a loop can take.
                    return Err(DnsFormatError::make_error(
                        "label pointer does not point backwards".to_string(),
                    ));
                }

                // We don't care where the other name ends, just what is there
                let (mut remainder, _) = deserialize_name(bytes, pointer_start)?;
                labels.append(&mut remainder);

                // A pointer always is the end of a label; we can advance the
                // position by the two bytes we've read and return.
                pos += 2;
                break;
            }
            0b00 => {
                // Read the next `len_byte` bytes as a label
                let length = len_byte as usize;
                pos += 1;
                if length == 0 {
                    // When we reach a label of length zero, we're done reading
                    // the name
                    break;
                }
                if length > 63 {
                    return Err(DnsFormatError::make_error(format!(
                        "label length {} exceeds maximum of 63",
                        length
                    )));
                }
                // Ensure the label we're about to read exists
                if pos + length > packet_len {
                    return Err(DnsFormatError::make_error(
                        "label length is longer than remainder of packet".to_string(),
                    ));
                }
                // The spec talks a lot about ASCII host names but the wire format never
                // requires it; we store labels as UTF-8 and leave case-folding to callers
                // that need DNS case-insensitive comparison (names::eq_label, template.rs).
                let label = String::from_utf8(bytes[pos..pos + length].to_vec()).map_err(|_| {
                    DnsFormatError::make_error("label was not valid UTF-8".to_string())
                })?;
                labels.push(label);
                pos += length;
            }
            _ => {
                // Technically, there is another label type possible here, proposed in RFC6891.
                // It's unclear if this is worth supporting in practice.
                return Err(DnsFormatError::make_error(
                    "unsupported or invalid label pointer type".to_string(),
                ));
            }
        }
    }
    Ok((labels, pos))
}

// This serialize doesn't take possible label compression into account
// It also assumes its input will not have any labels > 63 characters long
pub fn serialize_name(name: &[String]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for label in name {
        // First byte is label length
        let len: u8 = label.len() as u8;
        bytes.push(len);
        bytes.extend_from_slice(label.as_bytes());
    }
    // End with the null label
    bytes.push(0x00);

    bytes
}
