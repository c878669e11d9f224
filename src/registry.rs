//! The network registry (spec §4.3, component C3): the ordered list of
//! configured networks, and the `Prefix` type C1/C2 operate over.

use std::net::{Ipv6Addr, SocketAddr};

use thiserror::Error;

use crate::template::CompiledTemplate;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrefixError {
    #[error("prefix length {0} is out of range (must be 0..=128)")]
    LengthOutOfRange(u8),
    #[error("host width is {host_width} bits, which is not a multiple of 4")]
    HostWidthNotNibbleAligned { host_width: u8 },
    #[error("address has bits set below the prefix length")]
    NotNormalized,
}

/// An IPv6 network: an address plus a prefix length, normalized so that all
/// bits below the prefix length are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub addr: Ipv6Addr,
    pub len: u8,
}

impl Prefix {
    pub fn new(addr: Ipv6Addr, len: u8) -> Result<Prefix, PrefixError> {
        if len > 128 {
            return Err(PrefixError::LengthOutOfRange(len));
        }
        let host_width = 128 - len;
        if host_width % 4 != 0 {
            return Err(PrefixError::HostWidthNotNibbleAligned { host_width });
        }
        let mask: u128 = if host_width == 128 {
            0
        } else {
            !((1u128 << host_width) - 1)
        };
        if u128::from(addr) & !mask != 0 {
            return Err(PrefixError::NotNormalized);
        }
        Ok(Prefix { addr, len })
    }

    /// `h = 128 - p`, the number of host bits.
    pub fn host_width(&self) -> u32 {
        (128 - self.len) as u32
    }

    /// `h / 4`, the number of hex digits used to render the host bits.
    pub fn host_digit_count(&self) -> usize {
        self.host_width() as usize / 4
    }

    pub fn contains(&self, addr: Ipv6Addr) -> bool {
        let host_width = self.host_width();
        let mask: u128 = if host_width == 128 {
            0
        } else {
            !((1u128 << host_width) - 1)
        };
        u128::from(addr) & mask == u128::from(self.addr) & mask
    }
}

/// One `network` block from the configuration: a prefix, its compiled
/// template, and an optional upstream PTR resolver endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkRecord {
    pub prefix: Prefix,
    pub template: CompiledTemplate,
    pub upstream: Option<SocketAddr>,
}

/// The ordered collection of configured networks. Configuration order is
/// preserved and used as the tie-break for both lookup kinds: first match
/// wins (spec §4.3, §9 "Ordering vs longest-prefix").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    networks: Vec<NetworkRecord>,
}

impl Registry {
    pub fn new(networks: Vec<NetworkRecord>) -> Registry {
        Registry { networks }
    }

    pub fn find_by_addr(&self, addr: Ipv6Addr) -> Option<&NetworkRecord> {
        self.networks.iter().find(|net| net.prefix.contains(addr))
    }

    pub fn find_by_name(&self, qname: &[String]) -> Option<(&NetworkRecord, String)> {
        self.networks
            .iter()
            .find_map(|net| net.template.match_name(qname).map(|digits| (net, digits)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkRecord> {
        self.networks.iter()
    }
}
