//! UPC Symbology - Check Digits and Module Encoding
//!
//! Turns a digit string into the sequence of bars and spaces that a
//! raster writer paints. UPC-A is 95 modules wide, UPC-E is 51.

use thiserror::Error;

use crate::upc::UpcKind;

/// Odd-parity (left-hand) digit patterns, 7 modules each, MSB first.
const L_CODES: [u8; 10] = [
    0b0001101, 0b0011001, 0b0010011, 0b0111101, 0b0100011,
    0b0110001, 0b0101111, 0b0111011, 0b0110111, 0b0001011,
];

/// Even-parity patterns: the right-hand codes read backwards.
const G_CODES: [u8; 10] = [
    0b0100111, 0b0110011, 0b0011011, 0b0100001, 0b0011101,
    0b0111001, 0b0000101, 0b0010001, 0b0001001, 0b0010111,
];

/// UPC-E parity by check digit for number system 0, 1 = even (G code).
/// Number system 1 uses the complement.
const UPC_E_PARITY: [u8; 10] = [
    0b111000, 0b110100, 0b110010, 0b110001, 0b101100,
    0b100110, 0b100011, 0b101010, 0b101001, 0b100101,
];

pub const UPC_A_MODULES: usize = 95;
pub const UPC_E_MODULES: usize = 51;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("Expected {expected} digits, got '{input}'")]
    InvalidDigits { input: String, expected: usize },

    #[error("UPC-E number system must be 0 or 1, got {0}")]
    UnsupportedNumberSystem(u8),
}

/// One module of a printed symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Space,
    Bar,
    /// Bar belonging to a guard pattern; drawn taller.
    Guard,
}

impl Module {
    pub fn is_dark(self) -> bool {
        !matches!(self, Module::Space)
    }
}

/// A UPC ready for encoding, with its check digit recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: UpcKind,
    /// Full digit sequence, last digit is the computed check digit.
    pub digits: Vec<u8>,
    /// Check digit as it appeared in the input.
    pub supplied_check: u8,
}

impl Symbol {
    /// Parse and normalize `input` as `kind`.
    pub fn prepare(kind: UpcKind, input: &str) -> Result<Self, SymbolError> {
        let (mut digits, expected) = match kind {
            UpcKind::UpcA => {
                let upca = parse_digits::<12>(input)?;
                (upca.to_vec(), upc_check_digit(&upca[..11]))
            }
            UpcKind::UpcE => {
                let upce = parse_digits::<8>(input)?;
                (upce.to_vec(), upc_check_digit(&expand_upce(&upce)?))
            }
        };
        let last = digits.len() - 1;
        let supplied_check = digits[last];
        digits[last] = expected;

        Ok(Self { kind, digits, supplied_check })
    }

    pub fn check_digit(&self) -> u8 {
        self.digits[self.digits.len() - 1]
    }

    /// True when the input carried a different check digit.
    pub fn check_corrected(&self) -> bool {
        self.supplied_check != self.check_digit()
    }

    pub fn code(&self) -> String {
        self.digits.iter().map(|d| char::from(b'0' + d)).collect()
    }

    pub fn modules(&self) -> Vec<Module> {
        match self.kind {
            UpcKind::UpcA => encode_upca(&self.digits),
            UpcKind::UpcE => encode_upce(&self.digits),
        }
    }
}

fn parse_digits<const N: usize>(input: &str) -> Result<[u8; N], SymbolError> {
    if input.len() != N || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SymbolError::InvalidDigits {
            input: input.to_string(),
            expected: N,
        });
    }
    let mut digits = [0u8; N];
    for (slot, b) in digits.iter_mut().zip(input.bytes()) {
        *slot = b - b'0';
    }
    Ok(digits)
}

/// Modulo-10 check digit over the first 11 digits of a UPC-A body.
pub fn upc_check_digit(body: &[u8]) -> u8 {
    let sum: u32 = body
        .iter()
        .take(11)
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 * 3 } else { d as u32 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Expand a UPC-E code to the 11-digit UPC-A body; its check digit is ignored.
pub fn expand_upce(upce: &[u8; 8]) -> Result<[u8; 11], SymbolError> {
    let ns = upce[0];
    if ns > 1 {
        return Err(SymbolError::UnsupportedNumberSystem(ns));
    }
    let d = &upce[1..7];

    let body = match d[5] {
        0..=2 => [ns, d[0], d[1], d[5], 0, 0, 0, 0, d[2], d[3], d[4]],
        3 => [ns, d[0], d[1], d[2], 0, 0, 0, 0, 0, d[3], d[4]],
        4 => [ns, d[0], d[1], d[2], d[3], 0, 0, 0, 0, 0, d[4]],
        _ => [ns, d[0], d[1], d[2], d[3], d[4], 0, 0, 0, 0, d[5]],
    };
    Ok(body)
}

/// UPC-E string to its 12-digit UPC-A equivalent.
pub fn upce_to_upca(upce: &str) -> Result<String, SymbolError> {
    let digits = parse_digits::<8>(upce)?;
    let body = expand_upce(&digits)?;
    let check = upc_check_digit(&body);
    Ok(body
        .iter()
        .chain(std::iter::once(&check))
        .map(|d| char::from(b'0' + d))
        .collect())
}

fn push_pattern(out: &mut Vec<Module>, pattern: u8, width: u32) {
    for bit in (0..width).rev() {
        let module = if (pattern >> bit) & 1 == 1 { Module::Bar } else { Module::Space };
        out.push(module);
    }
}

fn push_guard(out: &mut Vec<Module>, pattern: &[u8]) {
    out.extend(pattern.iter().map(|&m| if m == 1 { Module::Guard } else { Module::Space }));
}

fn encode_upca(digits: &[u8]) -> Vec<Module> {
    let mut out = Vec::with_capacity(UPC_A_MODULES);
    push_guard(&mut out, &[1, 0, 1]);
    for &d in &digits[..6] {
        push_pattern(&mut out, L_CODES[d as usize], 7);
    }
    push_guard(&mut out, &[0, 1, 0, 1, 0]);
    for &d in &digits[6..12] {
        // R codes are the bitwise complement of L codes
        push_pattern(&mut out, !L_CODES[d as usize] & 0x7f, 7);
    }
    push_guard(&mut out, &[1, 0, 1]);
    out
}

fn encode_upce(digits: &[u8]) -> Vec<Module> {
    let ns = digits[0];
    let check = digits[7];
    let parity = if ns == 0 {
        UPC_E_PARITY[check as usize]
    } else {
        !UPC_E_PARITY[check as usize] & 0x3f
    };

    let mut out = Vec::with_capacity(UPC_E_MODULES);
    push_guard(&mut out, &[1, 0, 1]);
    for (i, &d) in digits[1..7].iter().enumerate() {
        let even = (parity >> (5 - i)) & 1 == 1;
        let code = if even { G_CODES[d as usize] } else { L_CODES[d as usize] };
        push_pattern(&mut out, code, 7);
    }
    push_guard(&mut out, &[0, 1, 0, 1, 0, 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_bits(modules: &[Module]) -> String {
        modules.iter().map(|m| if m.is_dark() { '1' } else { '0' }).collect()
    }

    #[test]
    fn test_check_digit_known_code() {
        let body = [0, 3, 6, 0, 0, 0, 2, 9, 1, 4, 5];
        assert_eq!(upc_check_digit(&body), 2);
    }

    #[test]
    fn test_g_codes_are_reversed_r_codes() {
        for d in 0..10 {
            let r = !L_CODES[d] & 0x7f;
            assert_eq!(G_CODES[d], r.reverse_bits() >> 1);
        }
    }

    #[test]
    fn test_upce_expansion_rules() {
        assert_eq!(upce_to_upca("01234565").unwrap(), "012345000065");
        // last data digit 0..=2 moves into the manufacturer code
        assert_eq!(&upce_to_upca("01234505").unwrap()[..11], "01200000345");
        assert_eq!(&upce_to_upca("01234531").unwrap()[..11], "01230000045");
        assert_eq!(&upce_to_upca("01234543").unwrap()[..11], "01234000005");
    }

    #[test]
    fn test_upce_to_upca_rejects_short_input() {
        assert_eq!(
            upce_to_upca("0123"),
            Err(SymbolError::InvalidDigits { input: "0123".into(), expected: 8 })
        );
        assert!(upce_to_upca("0123456x").is_err());
    }

    #[test]
    fn test_expand_upce_ignores_check_digit() {
        assert_eq!(expand_upce(&[0, 1, 2, 3, 4, 5, 6, 9]), Ok([0, 1, 2, 3, 4, 5, 0, 0, 0, 0, 6]));
    }

    #[test]
    fn test_upce_number_system_rejected() {
        assert_eq!(
            Symbol::prepare(UpcKind::UpcE, "21234565"),
            Err(SymbolError::UnsupportedNumberSystem(2))
        );
    }

    #[test]
    fn test_prepare_keeps_valid_check_digit() {
        let symbol = Symbol::prepare(UpcKind::UpcA, "036000291452").unwrap();
        assert!(!symbol.check_corrected());
        assert_eq!(symbol.code(), "036000291452");
    }

    #[test]
    fn test_prepare_corrects_bad_check_digit() {
        let symbol = Symbol::prepare(UpcKind::UpcE, "12345678").unwrap();
        assert!(symbol.check_corrected());
        assert_eq!(symbol.supplied_check, 8);
        assert_eq!(symbol.check_digit(), 0);
    }

    #[test]
    fn test_prepare_rejects_wrong_width() {
        assert!(matches!(
            Symbol::prepare(UpcKind::UpcA, "12345678"),
            Err(SymbolError::InvalidDigits { expected: 12, .. })
        ));
    }

    #[test]
    fn test_upca_layout() {
        let symbol = Symbol::prepare(UpcKind::UpcA, "036000291452").unwrap();
        let modules = symbol.modules();
        assert_eq!(modules.len(), UPC_A_MODULES);

        let bits = as_bits(&modules);
        assert_eq!(&bits[..3], "101");
        // first digit 0, left-hand odd parity
        assert_eq!(&bits[3..10], "0001101");
        assert_eq!(&bits[45..50], "01010");
        // last digit 2, right-hand code
        assert_eq!(&bits[85..92], "1101100");
        assert_eq!(&bits[92..], "101");
        assert_eq!(modules[0], Module::Guard);
        assert_eq!(modules[4], Module::Space);
    }

    #[test]
    fn test_upce_layout() {
        let symbol = Symbol::prepare(UpcKind::UpcE, "01234565").unwrap();
        let modules = symbol.modules();
        assert_eq!(modules.len(), UPC_E_MODULES);

        let bits = as_bits(&modules);
        assert_eq!(&bits[..3], "101");
        // check digit 5, system 0: EOOEEO; first data digit 1 even
        assert_eq!(&bits[3..10], "0110011");
        // second data digit 2 odd
        assert_eq!(&bits[10..17], "0010011");
        assert_eq!(&bits[45..], "010101");
    }

    #[test]
    fn test_upce_system_one_inverts_parity() {
        let zero = as_bits(&Symbol::prepare(UpcKind::UpcE, "01234565").unwrap().modules());
        let one = Symbol::prepare(UpcKind::UpcE, "11234565").unwrap();
        let one_bits = as_bits(&one.modules());
        assert_ne!(&zero[3..10], &one_bits[3..10]);
        // digit 1 in odd parity
        assert_eq!(&one_bits[3..10], "0011001");
    }
}
