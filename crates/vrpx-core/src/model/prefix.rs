//! Strict CIDR prefixes.
//!
//! Parsing is strict: a network whose host bits are not all zero is an
//! error, never silently masked. A bare address is a host route
//! (`/32` or `/128`).

use super::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// An IPv4 or IPv6 network with a zero host part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    addr: IpAddr,
    len: u8,
}

impl Prefix {
    /// Build a prefix, rejecting out-of-range lengths and set host bits.
    pub fn new(addr: IpAddr, len: u8) -> Result<Self, FieldError> {
        let candidate = Self { addr, len };
        if len > max_len(&addr) {
            return Err(FieldError::InvalidPrefix {
                value: candidate.to_string(),
                reason: format!("prefix length {} exceeds {}", len, max_len(&addr)),
            });
        }
        if has_host_bits(&addr, len) {
            return Err(FieldError::HostBitsSet {
                value: candidate.to_string(),
            });
        }
        Ok(candidate)
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }
}

fn max_len(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn has_host_bits(addr: &IpAddr, len: u8) -> bool {
    match addr {
        IpAddr::V4(v4) => {
            let host_mask = u32::MAX.checked_shr(u32::from(len)).unwrap_or(0);
            u32::from(*v4) & host_mask != 0
        }
        IpAddr::V6(v6) => {
            let host_mask = u128::MAX.checked_shr(u32::from(len)).unwrap_or(0);
            u128::from(*v6) & host_mask != 0
        }
    }
}

impl FromStr for Prefix {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| FieldError::InvalidPrefix {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (addr_part, len_part) = match s.split_once('/') {
            Some((addr, len)) => (addr, Some(len)),
            None => (s, None),
        };

        let addr: IpAddr = addr_part
            .parse()
            .map_err(|_| invalid("address does not parse"))?;

        let len = match len_part {
            None => max_len(&addr),
            Some(raw) => {
                if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("prefix length must be decimal digits"));
                }
                let len: u32 = raw
                    .parse()
                    .map_err(|_| invalid("prefix length out of range"))?;
                if len > u32::from(max_len(&addr)) {
                    return Err(invalid("prefix length out of range"));
                }
                len as u8
            }
        };

        if has_host_bits(&addr, len) {
            return Err(FieldError::HostBitsSet {
                value: s.to_string(),
            });
        }

        Ok(Self { addr, len })
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl Serialize for Prefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Prefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
