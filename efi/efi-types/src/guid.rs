//! # Vendor GUIDs
//!
//! A GUID is kept as the 16 raw bytes found on the wire. The first three
//! groups are little-endian integers, so the canonical text form reverses
//! their bytes while the last two groups are printed in storage order:
//!
//! ```text
//! bytes:  b0 b1 b2 b3 | b4 b5 | b6 b7 | b8 b9 | b10 .. b15
//! text:   b3b2b1b0   - b5b4  - b7b6  - b8b9  - b10..b15
//! ```

use core::fmt;
use core::str::FromStr;

/// Length of the canonical text form, `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
pub const GUID_TEXT_LEN: usize = 36;

/// Byte index of the source byte for each hex pair of the text form.
const TEXT_ORDER: [usize; 16] = [3, 2, 1, 0, 5, 4, 7, 6, 8, 9, 10, 11, 12, 13, 14, 15];

/// Positions of the `-` separators in the text form.
const DASHES: [usize; 4] = [8, 13, 18, 23];

/// A 128-bit vendor GUID in wire byte order.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VendorGuid([u8; 16]);

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuidParseError {
    #[error("GUID text must be 36 characters, got {0}")]
    Length(usize),
    #[error("expected '-' at offset {0}")]
    Separator(usize),
    #[error("invalid hex digit at offset {0}")]
    HexDigit(usize),
}

impl VendorGuid {
    /// `EFI_GLOBAL_VARIABLE`, the namespace of all architecturally defined
    /// variables (`Boot####`, `BootOrder`, `ConOut`, ...).
    pub const GLOBAL_VARIABLE: Self = Self([
        0x61, 0xdf, 0xe4, 0x8b, 0xca, 0x93, 0xd2, 0x11, 0xaa, 0x0d, 0x00, 0xe0, 0x98, 0x03, 0x2b,
        0x8c,
    ]);

    /// Wraps 16 bytes in wire order.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// The 16 bytes in wire order.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Reads a GUID from the first 16 bytes of `bytes`.
    #[must_use]
    pub fn read(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 16] = bytes.get(..16)?.try_into().ok()?;
        Some(Self(raw))
    }
}

impl fmt::Display for VendorGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &src) in TEXT_ORDER.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", self.0[src])?;
        }
        Ok(())
    }
}

impl FromStr for VendorGuid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.as_bytes();
        if text.len() != GUID_TEXT_LEN {
            return Err(GuidParseError::Length(text.len()));
        }

        for &pos in &DASHES {
            if text[pos] != b'-' {
                return Err(GuidParseError::Separator(pos));
            }
        }

        let mut bytes = [0u8; 16];
        let mut pos = 0;
        for &dst in &TEXT_ORDER {
            if DASHES.contains(&pos) {
                pos += 1;
            }
            let hi = hex_value(text[pos]).ok_or(GuidParseError::HexDigit(pos))?;
            let lo = hex_value(text[pos + 1]).ok_or(GuidParseError::HexDigit(pos + 1))?;
            bytes[dst] = (hi << 4) | lo;
            pos += 2;
        }

        Ok(Self(bytes))
    }
}

const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_variable_renders_canonically() {
        assert_eq!(
            VendorGuid::GLOBAL_VARIABLE.to_string(),
            "8be4df61-93ca-11d2-aa0d-00e098032b8c"
        );
    }

    #[test]
    fn text_swizzles_first_three_groups() {
        let g = VendorGuid::from_bytes([
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ]);
        assert_eq!(g.to_string(), "03020100-0504-0706-0809-0a0b0c0d0e0f");
    }

    #[test]
    fn parse_accepts_either_case() {
        let g: VendorGuid = "8BE4DF61-93CA-11D2-AA0D-00E098032B8C".parse().unwrap();
        assert_eq!(g, VendorGuid::GLOBAL_VARIABLE);
    }

    #[test]
    fn parse_rejects_bad_text() {
        assert_eq!(
            "8be4df61".parse::<VendorGuid>(),
            Err(GuidParseError::Length(8))
        );
        assert_eq!(
            "8be4df61_93ca-11d2-aa0d-00e098032b8c".parse::<VendorGuid>(),
            Err(GuidParseError::Separator(8))
        );
        assert_eq!(
            "8be4df6g-93ca-11d2-aa0d-00e098032b8c".parse::<VendorGuid>(),
            Err(GuidParseError::HexDigit(7))
        );
    }

    #[test]
    fn read_requires_sixteen_bytes() {
        assert_eq!(VendorGuid::read(&[0; 15]), None);
        assert_eq!(VendorGuid::read(&[0; 20]), Some(VendorGuid::default()));
    }
}
