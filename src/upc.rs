//! UPC Input Normalization - Clean, Classify, Name
//!
//! Raw lines become digit strings; digit strings become a symbology.
//! Nothing here knows about check digits or bars.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const UPC_A_DIGITS: usize = 12;
pub const UPC_E_DIGITS: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum UpcKind {
    /// 12-digit retail code
    UpcA,
    /// 8-digit zero-suppressed code
    UpcE,
}

impl UpcKind {
    pub fn digit_count(self) -> usize {
        match self {
            UpcKind::UpcA => UPC_A_DIGITS,
            UpcKind::UpcE => UPC_E_DIGITS,
        }
    }
}

impl fmt::Display for UpcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpcKind::UpcA => f.write_str("UPC-A"),
            UpcKind::UpcE => f.write_str("UPC-E"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpcError {
    #[error("Invalid UPC length: {digits} digits. Must be 8 or 12 digits.")]
    InvalidLength { digits: usize },
}

/// Strip everything that is not an ASCII digit.
pub fn clean(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Pick the symbology for an already-cleaned digit string.
pub fn classify(cleaned: &str) -> Result<UpcKind, UpcError> {
    match cleaned.len() {
        UPC_A_DIGITS => Ok(UpcKind::UpcA),
        UPC_E_DIGITS => Ok(UpcKind::UpcE),
        digits => Err(UpcError::InvalidLength { digits }),
    }
}

/// Output file stem: zero-padded index, underscore, digits.
///
/// The index keeps directory listings in input order.
pub fn file_stem(index: usize, cleaned: &str) -> String {
    format!("{:04}_{}", index, cleaned)
}
