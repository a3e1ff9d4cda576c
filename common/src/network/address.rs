//! # Address Composition
//!
//! Turns a dotted Roman-numeral address into a canonical four-octet IPv4 address.
//!
//! Addresses may carry between one and four segments. Missing trailing segments
//! are padded with zero, so `CXXVII` becomes `127.0.0.0`. Empty segments between
//! dots decode to zero as well, which makes `CXXVII...I` equal to `127.0.0.1`.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;

use crate::network::numeral::{self, DecodeError};

pub const OCTET_COUNT: usize = 4;
pub const SEPARATOR: char = '.';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("invalid IP address format: expected 1-4 octets separated by dots, got {0}")]
    InvalidSegmentCount(usize),
    #[error("error in octet {index} ({segment}): {cause}")]
    OctetError {
        index: usize,
        segment: String,
        #[source]
        cause: DecodeError,
    },
}

/// A fully decoded, zero-padded IPv4 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalAddress {
    octets: [u8; OCTET_COUNT],
}

impl CanonicalAddress {
    pub fn new(octets: [u8; OCTET_COUNT]) -> Self {
        Self { octets }
    }

    pub fn octets(&self) -> [u8; OCTET_COUNT] {
        self.octets
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets;
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl From<CanonicalAddress> for Ipv4Addr {
    fn from(address: CanonicalAddress) -> Self {
        Ipv4Addr::from(address.octets)
    }
}

impl From<CanonicalAddress> for IpAddr {
    fn from(address: CanonicalAddress) -> Self {
        IpAddr::V4(address.into())
    }
}

/// Splits `address` on dots and returns its segments.
///
/// Only the empty string has no segments. Whitespace is kept and fails to decode.
fn segments(address: &str) -> Vec<&str> {
    if address.is_empty() {
        return Vec::new();
    }
    address.split(SEPARATOR).collect()
}

/// Composes a [`CanonicalAddress`] from a Roman-numeral address.
///
/// Fails on the first segment that does not decode. Nothing is returned for
/// partially valid input.
pub fn compose(address: &str) -> Result<CanonicalAddress, ComposeError> {
    let parts: Vec<&str> = segments(address);

    if parts.is_empty() || parts.len() > OCTET_COUNT {
        return Err(ComposeError::InvalidSegmentCount(parts.len()));
    }

    // Unfilled positions stay zero, which is the trailing padding.
    let mut octets = [0u8; OCTET_COUNT];

    for (i, part) in parts.iter().enumerate() {
        octets[i] = numeral::decode(part).map_err(|cause| ComposeError::OctetError {
            index: i + 1,
            segment: part.to_string(),
            cause,
        })?;
    }

    Ok(CanonicalAddress::new(octets))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
