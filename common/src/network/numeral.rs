//! # Roman Numeral Octets
//!
//! Decodes a single Roman-numeral token into an IPv4 octet.
//!
//! The grammar is deliberately permissive: tokens are scanned right to left and
//! each symbol is added or subtracted depending on the symbol seen just before it.
//! This accepts every standard subtractive pair (`IV`, `IX`, `XL`, `XC`, `CD`, `CM`)
//! but also forms like `IIII` or `IIX`, which decode to whatever the scan yields.
//!
//! Classical numerals have no zero. The late convention of writing `N` (short for
//! *nulla*) is honoured through [`ZeroLiteral`], which is checked before the scan.

use thiserror::Error;

/// Largest value an IPv4 octet can hold.
pub const OCTET_MAX: i64 = u8::MAX as i64;

/// Symbol table used by the right-to-left scan.
pub const NUMERAL_TABLE: [(char, i64); 7] = [
    ('I', 1),
    ('V', 5),
    ('X', 10),
    ('L', 50),
    ('C', 100),
    ('D', 500),
    ('M', 1000),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid Roman numeral symbol: {0}")]
    InvalidSymbol(char),
    #[error("Roman numeral converts to {0}, which is out of range (0-255)")]
    OutOfRange(i64),
}

/// Reserved spellings of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroLiteral {
    /// `N` or `n`.
    N,
    /// `nulla`, in any case.
    Nulla,
    /// An empty segment, as produced by consecutive dots (`CXXVII...I`).
    Elided,
}

impl ZeroLiteral {
    pub fn recognize(token: &str) -> Option<Self> {
        if token.is_empty() {
            Some(ZeroLiteral::Elided)
        } else if token.eq_ignore_ascii_case("n") {
            Some(ZeroLiteral::N)
        } else if token.eq_ignore_ascii_case("nulla") {
            Some(ZeroLiteral::Nulla)
        } else {
            None
        }
    }
}

/// Simple Unicode uppercase of `symbol`, so `ı` becomes `I`.
///
/// Symbols whose uppercase spans several chars (`ß` → `SS`) are left as they are.
fn uppercase(symbol: char) -> char {
    let mut upper = symbol.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => symbol,
    }
}

fn symbol_value(symbol: char) -> Option<i64> {
    NUMERAL_TABLE
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, value)| *value)
}

/// Decodes `token` into an octet value.
///
/// Zero literals short-circuit to `0`. Anything else is upper-cased and scanned
/// from the last character to the first; the first unknown symbol aborts with
/// [`DecodeError::InvalidSymbol`]. Totals outside `0..=255` are rejected with
/// [`DecodeError::OutOfRange`].
pub fn decode(token: &str) -> Result<u8, DecodeError> {
    if ZeroLiteral::recognize(token).is_some() {
        return Ok(0);
    }

    let mut total: i64 = 0;
    let mut prev_value: i64 = 0;

    for symbol in token.chars().rev() {
        let symbol = uppercase(symbol);
        let value = symbol_value(symbol).ok_or(DecodeError::InvalidSymbol(symbol))?;

        if value < prev_value {
            total = total.saturating_sub(value);
        } else {
            total = total.saturating_add(value);
        }
        prev_value = value;
    }

    if !(0..=OCTET_MAX).contains(&total) {
        return Err(DecodeError::OutOfRange(total));
    }

    Ok(total as u8)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
