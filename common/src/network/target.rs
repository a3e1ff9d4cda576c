//! # Probe Target Model
//!
//! Defines the destination handed to the pinger.
//!
//! A target keeps both spellings of the address: the Roman form the user typed,
//! used when reporting, and the [`CanonicalAddress`] the packets are sent to.

use std::fmt;
use std::str::FromStr;

use crate::network::address::{self, CanonicalAddress, ComposeError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RomanTarget {
    pub roman: String,
    pub canonical: CanonicalAddress,
}

impl FromStr for RomanTarget {
    type Err = ComposeError;

    /// Parses a Roman-numeral address such as `CXXVII.N.N.I` or `CXXVII...I`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = address::compose(s)?;
        Ok(Self {
            roman: s.to_string(),
            canonical,
        })
    }
}

impl fmt::Display for RomanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.roman, self.canonical)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
