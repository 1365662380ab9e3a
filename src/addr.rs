//! IPv4 address and CIDR codec.
//!
//! All text-to-binary conversion happens here. `Cidr` clears the host
//! portion of the address on construction, so downstream components can
//! rely on the network/prefix pair being canonical without re-masking.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::Ipv4Net;

use crate::{Error, Result};

/// Parse a canonical dotted-quad IPv4 address.
///
/// Rejects shorthand forms (`10/8`) and leading-zero octets.
pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr> {
    s.parse::<Ipv4Addr>()
        .map_err(|_| Error::InvalidAddress(s.to_string()))
}

/// Format an IPv4 address as a canonical dotted quad.
pub fn format_ipv4(addr: Ipv4Addr) -> String {
    addr.to_string()
}

/// An IPv4 network prefix.
///
/// Invariants, enforced at every constructor:
/// - the prefix length is in `[1, 32]` (`/0` is rejected everywhere);
/// - the low `32 - prefix_len` host bits of the network are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cidr(Ipv4Net);

impl Cidr {
    /// Create a Cidr from an address and prefix length, masking host bits.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self> {
        if !(1..=32).contains(&prefix_len) {
            return Err(Error::InvalidCidr(format!("{}/{}", addr, prefix_len)));
        }
        let net = Ipv4Net::new(addr, prefix_len)
            .map_err(|_| Error::InvalidCidr(format!("{}/{}", addr, prefix_len)))?;
        Ok(Self(net.trunc()))
    }

    /// The network address (host bits are zero).
    pub fn network(&self) -> Ipv4Addr {
        self.0.network()
    }

    /// The prefix length, in `[1, 32]`.
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// The bucket offset: `32 - prefix_len`, in `[0, 31]`.
    pub fn offset(&self) -> u8 {
        32 - self.0.prefix_len()
    }

    /// The storage key: the network right-aligned into the low
    /// `prefix_len` bits. Two Cidrs are equal iff their
    /// `(offset, shifted_key)` pairs are equal.
    pub fn shifted_key(&self) -> u32 {
        u32::from(self.network()) >> self.offset()
    }

    /// Rebuild a Cidr from its `(offset, shifted_key)` storage form.
    pub(crate) fn from_shifted(offset: u8, key: u32) -> Self {
        debug_assert!(offset < 32);
        let network = Ipv4Addr::from(key << offset);
        let net = Ipv4Net::new(network, 32 - offset)
            .expect("offset < 32 implies a prefix length in [1, 32]");
        Self(net)
    }

    /// True if this prefix covers the given address.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.0.contains(&addr)
    }
}

impl FromStr for Cidr {
    type Err = Error;

    /// Parse `"network/prefix"`, masking host bits.
    fn from_str(s: &str) -> Result<Self> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| Error::InvalidCidr(s.to_string()))?;
        let addr = addr
            .parse::<Ipv4Addr>()
            .map_err(|_| Error::InvalidCidr(s.to_string()))?;
        let prefix_len = prefix
            .parse::<u8>()
            .map_err(|_| Error::InvalidCidr(s.to_string()))?;
        Self::new(addr, prefix_len)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
