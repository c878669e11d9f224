//! The address codec (spec §4.1, component C1): conversions between an
//! IPv6 address and its reverse-DNS label sequence, and between an
//! address's host bits and a hex digit string relative to a prefix.
//!
//! Routing both PTR and AAAA synthesis through these four functions
//! guarantees the round-trip invariant in spec §8: `addr_from_digits(
//! host_digits(a, prefix), prefix) == a` for every `a` inside `prefix`.

use std::net::Ipv6Addr;

use thiserror::Error;

use crate::registry::Prefix;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressCodecError {
    #[error("name is not a well-formed ip6.arpa PTR name: {0}")]
    MalformedName(String),
    #[error("address does not lie within the network")]
    OutOfNetwork,
    #[error("expected {expected} hex digits, got {got}")]
    DigitCountMismatch { expected: usize, got: usize },
    #[error("digit string contains a non-hex character")]
    NonHexDigit,
}

/// Produce the 34-label `ip6.arpa` PTR query name for `addr`: 32 nibble
/// labels, least-significant nibble first, followed by `ip6` and `arpa`.
pub fn ptr_labels(addr: Ipv6Addr) -> Vec<String> {
    let octets = addr.octets();
    let mut labels = Vec::with_capacity(34);
    // Walk nibbles from least significant to most significant. The address is
    // stored big-endian, so the least significant nibble is the low nibble of
    // the last octet.
    for byte in octets.iter().rev() {
        labels.push(format!("{:x}", byte & 0x0f));
        labels.push(format!("{:x}", (byte >> 4) & 0x0f));
    }
    labels.push("ip6".to_string());
    labels.push("arpa".to_string());
    labels
}

/// Inverse of [`ptr_labels`]: reconstruct the address from a 34-label
/// `ip6.arpa` name. Fails with `MalformedName` unless there are exactly 34
/// labels, the last two are (case-insensitively) `ip6` and `arpa`, and the
/// preceding 32 are each a single hex character.
pub fn addr_from_ptr(labels: &[String]) -> Result<Ipv6Addr, AddressCodecError> {
    if labels.len() != 34 {
        return Err(AddressCodecError::MalformedName(format!(
            "expected 34 labels, got {}",
            labels.len()
        )));
    }
    if !labels[32].eq_ignore_ascii_case("ip6") || !labels[33].eq_ignore_ascii_case("arpa") {
        return Err(AddressCodecError::MalformedName(
            "name does not end in ip6.arpa".to_string(),
        ));
    }

    let mut octets = [0u8; 16];
    for (i, label) in labels[0..32].iter().enumerate() {
        let nibble = parse_single_hex_char(label).ok_or_else(|| {
            AddressCodecError::MalformedName(format!("label {:?} is not a single hex digit", label))
        })?;
        // labels[0] is the least significant nibble of the address; octets[15]
        // holds the least significant byte, whose low nibble comes first.
        let octet_index = 15 - (i / 2);
        if i % 2 == 0 {
            octets[octet_index] |= nibble;
        } else {
            octets[octet_index] |= nibble << 4;
        }
    }

    Ok(Ipv6Addr::from(octets))
}

fn parse_single_hex_char(label: &str) -> Option<u8> {
    let mut chars = label.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    c.to_digit(16).map(|d| d as u8)
}

/// Returns `h/4` lowercase hex characters representing the low `h` bits of
/// `addr`, zero-padded on the left, where `h = 128 - prefix.len`. Requires
/// `addr` to lie within `prefix`.
pub fn host_digits(addr: Ipv6Addr, prefix: &Prefix) -> Result<String, AddressCodecError> {
    if !prefix.contains(addr) {
        return Err(AddressCodecError::OutOfNetwork);
    }
    let digit_count = prefix.host_digit_count();
    let value = u128::from(addr);
    let host_bits = prefix.host_width();
    let mask: u128 = if host_bits == 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    };
    let host_value = value & mask;
    Ok(format!(
        "{:0width$x}",
        host_value,
        width = digit_count
    ))
}

/// Inverse of [`host_digits`]: rebuild the address by combining `prefix`'s
/// upper bits with the digit run. Requires `digits` to have exactly
/// `prefix.host_digit_count()` hex characters.
pub fn addr_from_digits(digits: &str, prefix: &Prefix) -> Result<Ipv6Addr, AddressCodecError> {
    let expected = prefix.host_digit_count();
    if digits.len() != expected {
        return Err(AddressCodecError::DigitCountMismatch {
            expected,
            got: digits.len(),
        });
    }
    let host_value = u128::from_str_radix(digits, 16).map_err(|_| AddressCodecError::NonHexDigit)?;

    let host_bits = prefix.host_width();
    let mask: u128 = if host_bits == 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    };
    let network_value = u128::from(prefix.addr) & !mask;
    Ok(Ipv6Addr::from(network_value | (host_value & mask)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(addr: &str, len: u8) -> Prefix {
        Prefix::new(addr.parse().unwrap(), len).unwrap()
    }

    #[test]
    fn ptr_labels_reverses_nibbles() {
        let addr: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let labels = ptr_labels(addr);
        assert_eq!(labels.len(), 34);
        assert_eq!(labels[32], "ip6");
        assert_eq!(labels[33], "arpa");
        // Least significant nibble of ::1 is '1'.
        assert_eq!(labels[0], "1");
    }

    #[test]
    fn ptr_round_trips_with_addr_from_ptr() {
        let addr: Ipv6Addr = "2001:db8::1234:5678:9abc:def0".parse().unwrap();
        let labels = ptr_labels(addr);
        let decoded = addr_from_ptr(&labels).expect("should decode");
        assert_eq!(decoded, addr);
    }

    #[test]
    fn addr_from_ptr_rejects_wrong_label_count() {
        let labels = vec!["ip6".to_string(), "arpa".to_string()];
        assert_eq!(
            addr_from_ptr(&labels),
            Err(AddressCodecError::MalformedName(
                "expected 34 labels, got 2".to_string()
            ))
        );
    }

    #[test]
    fn addr_from_ptr_rejects_non_hex_nibble() {
        let mut labels = ptr_labels("2001:db8::1".parse().unwrap());
        labels[0] = "z".to_string();
        assert!(addr_from_ptr(&labels).is_err());
    }

    #[test]
    fn addr_from_ptr_is_case_insensitive_on_suffix() {
        let mut labels = ptr_labels("2001:db8::1".parse().unwrap());
        labels[32] = "IP6".to_string();
        labels[33] = "ARPA".to_string();
        assert!(addr_from_ptr(&labels).is_ok());
    }

    #[test]
    fn host_digits_has_correct_width() {
        let p = prefix("2001:db8::", 64);
        let addr: Ipv6Addr = "2001:db8::1234:5678:9abc:def0".parse().unwrap();
        let digits = host_digits(addr, &p).expect("in network");
        assert_eq!(digits.len(), 16);
        assert_eq!(digits, "00000000123456789abcdef0"[8..]); // sanity against a known literal below
    }

    #[test]
    fn host_digits_matches_concrete_scenario() {
        let p = prefix("2001:db8::", 64);
        let addr: Ipv6Addr = "2001:db8::1234:5678:9abc:def0".parse().unwrap();
        let digits = host_digits(addr, &p).expect("in network");
        // A /64 host is 64 bits = 16 nibbles; the spec's own worked example
        // pads the digit run to 24 characters, which doesn't match its own
        // prefix length.
        assert_eq!(digits, "123456789abcdef0");
    }

    #[test]
    fn host_digits_rejects_out_of_network() {
        let p = prefix("2001:db8::", 64);
        let addr: Ipv6Addr = "2001:dead::1".parse().unwrap();
        assert_eq!(host_digits(addr, &p), Err(AddressCodecError::OutOfNetwork));
    }

    #[test]
    fn addr_from_digits_round_trips_with_host_digits() {
        let p = prefix("2001:db8::", 64);
        let addr: Ipv6Addr = "2001:db8::1234:5678:9abc:def0".parse().unwrap();
        let digits = host_digits(addr, &p).unwrap();
        let rebuilt = addr_from_digits(&digits, &p).unwrap();
        assert_eq!(rebuilt, addr);
    }

    #[test]
    fn addr_from_digits_rejects_wrong_count() {
        let p = prefix("2001:db8::", 64);
        assert_eq!(
            addr_from_digits("dead", &p),
            Err(AddressCodecError::DigitCountMismatch {
                expected: 16,
                got: 4
            })
        );
    }

    #[test]
    fn addr_from_digits_rejects_non_hex() {
        let p = prefix("2001:db8::", 64);
        let digits = "g".repeat(16);
        assert_eq!(addr_from_digits(&digits, &p), Err(AddressCodecError::NonHexDigit));
    }

    #[test]
    fn every_address_in_network_round_trips() {
        let p = prefix("2001:db8::", 120);
        for low_byte in 0..=255u8 {
            let mut octets = p.addr.octets();
            octets[15] = low_byte;
            let addr = Ipv6Addr::from(octets);
            let digits = host_digits(addr, &p).unwrap();
            assert_eq!(digits.len(), 2);
            let rebuilt = addr_from_digits(&digits, &p).unwrap();
            assert_eq!(rebuilt, addr);
        }
    }
}
