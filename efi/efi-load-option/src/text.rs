//! # Free-form Variable Text
//!
//! Several variables (`Lang`, `PlatformLang`, their `*Codes` lists, and the
//! optional data of many boot entries) hold text without saying how it is
//! encoded. [`detect_encoding`] guesses between narrow bytes and UCS-2 by
//! looking at where the first zero byte falls. The guess is best-effort: a
//! narrow string starting with a NUL, or a one-character UCS-2 string, is
//! misclassified.

use alloc::string::String;
use core::fmt::Write;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextEncoding {
    /// Plain 8-bit characters.
    Narrow,
    /// 16-bit units, high byte first (`00 41 ..`).
    WideBigEndian,
    /// 16-bit units, low byte first (`41 00 ..`).
    WideLittleEndian,
}

/// Classifies `data` by its first two bytes.
///
/// Fields of two bytes or fewer are always [`TextEncoding::Narrow`].
#[must_use]
pub fn detect_encoding(data: &[u8]) -> TextEncoding {
    match *data {
        [0, second, _, ..] if second != 0 => TextEncoding::WideBigEndian,
        [first, 0, _, ..] if first != 0 => TextEncoding::WideLittleEndian,
        _ => TextEncoding::Narrow,
    }
}

/// Decodes `data` using [`detect_encoding`], stopping at the first null
/// character.
///
/// Wide text is narrowed to the low byte of each unit, like every other
/// firmware string.
#[must_use]
pub fn decode_text(data: &[u8]) -> String {
    match detect_encoding(data) {
        TextEncoding::Narrow => data
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect(),
        TextEncoding::WideLittleEndian => efi_ucs2::decode_le(data),
        TextEncoding::WideBigEndian => efi_ucs2::to_narrow_string(
            data.chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
        ),
    }
}

/// Renders arbitrary bytes as text: printable ASCII is kept, everything else
/// becomes a `\xNN` escape.
#[must_use]
pub fn escape_raw(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        if b == b' ' || b.is_ascii_graphic() {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "\\x{b:02x}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_needs_more_than_two_bytes() {
        assert_eq!(detect_encoding(&[]), TextEncoding::Narrow);
        assert_eq!(detect_encoding(&[0x41]), TextEncoding::Narrow);
        assert_eq!(detect_encoding(&[0x41, 0x00]), TextEncoding::Narrow);
        assert_eq!(detect_encoding(&[0x00, 0x41]), TextEncoding::Narrow);
    }

    #[test]
    fn heuristic_detects_byte_order() {
        assert_eq!(
            detect_encoding(&[0x00, 0x41, 0x00, 0x42]),
            TextEncoding::WideBigEndian
        );
        assert_eq!(
            detect_encoding(&[0x41, 0x00, 0x42, 0x00]),
            TextEncoding::WideLittleEndian
        );
        assert_eq!(detect_encoding(b"en-US\0"), TextEncoding::Narrow);
        assert_eq!(detect_encoding(&[0, 0, 0x41]), TextEncoding::Narrow);
    }

    #[test]
    fn decodes_each_encoding() {
        assert_eq!(decode_text(b"en-US\0"), "en-US");
        assert_eq!(decode_text(b"engfra"), "engfra");
        assert_eq!(decode_text(&efi_ucs2::encode_le("en-US")), "en-US");
        assert_eq!(decode_text(&[0x00, b'e', 0x00, b'n', 0x00, 0x00]), "en");
    }

    #[test]
    fn escapes_non_printables() {
        assert_eq!(escape_raw(b"root=/dev/sda1 ro"), "root=/dev/sda1 ro");
        assert_eq!(escape_raw(&[b'R', 0x00, 0xFF, b'\n']), "R\\x00\\xff\\x0a");
        assert_eq!(escape_raw(&[]), "");
    }
}
