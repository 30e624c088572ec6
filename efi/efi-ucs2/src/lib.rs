//! # UCS-2 Strings as Stored by Firmware
//!
//! UEFI stores every human-readable string (variable names, boot entry
//! descriptions, file paths inside device paths) as null-terminated UCS-2:
//! 16-bit little-endian code units with no surrogate handling.
//!
//! This crate provides the handful of operations needed to walk such strings
//! inside untrusted binary blobs:
//!
//! * [`strlen`] / [`strlen_le`]: count units up to the terminator, never
//!   reading past the end of the buffer.
//! * [`strsize`] / [`strsize_le`]: the byte size including the terminator,
//!   used to locate the field that follows a string in a binary layout.
//! * [`to_narrow`] / [`from_narrow`]: copy between narrow and wide buffers
//!   with C-style capacity semantics.
//!
//! ## Narrowing is lossy
//!
//! Narrowing keeps the **low byte** of each code unit and drops the high
//! byte. This is not Unicode transcoding; it matches how firmware tooling has
//! always rendered these strings and is kept for output compatibility. Owned
//! helpers ([`to_narrow_string`], [`decode_le`]) map each kept byte to the
//! Unicode scalar of the same value (i.e. Latin-1).

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// Width of a single UCS-2 code unit, in bytes.
pub const CHAR_WIDTH: usize = 2;

/// Iterate the little-endian code units contained in `bytes`.
///
/// A trailing odd byte is ignored.
pub fn units(bytes: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bytes
        .chunks_exact(CHAR_WIDTH)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
}

/// Counts code units up to the first null, the end of `wide`, or `max_chars`
/// (when given), whichever comes first.
///
/// An empty buffer or one whose first unit is null yields `0`.
#[must_use]
pub fn strlen(wide: &[u16], max_chars: Option<usize>) -> usize {
    match wide.first() {
        None | Some(&0) => return 0,
        Some(_) => {}
    }

    let bound = max_chars.map_or(wide.len(), |max| max.min(wide.len()));
    wide[..bound].iter().position(|&c| c == 0).unwrap_or(bound)
}

/// Like [`strlen`], but over a little-endian byte buffer.
#[must_use]
pub fn strlen_le(bytes: &[u8], max_chars: Option<usize>) -> usize {
    units(bytes)
        .take(max_chars.unwrap_or(usize::MAX))
        .take_while(|&c| c != 0)
        .count()
}

/// Size in bytes of the string in `wide`, including its terminator.
///
/// If `wide` is not terminated the result exceeds `wide.len() * CHAR_WIDTH`;
/// callers locating a following field must bounds-check it.
#[must_use]
pub fn strsize(wide: &[u16]) -> usize {
    (strlen(wide, None) + 1) * CHAR_WIDTH
}

/// Like [`strsize`], but over a little-endian byte buffer.
#[must_use]
pub fn strsize_le(bytes: &[u8]) -> usize {
    (strlen_le(bytes, None) + 1) * CHAR_WIDTH
}

/// Copies the low byte of each unit of `wide` into `dest`, stopping at the
/// terminator or at `dest.len() - 1`, and null-terminates `dest`.
///
/// Returns the number of narrow characters written, excluding the
/// terminator. A zero-length `dest` is left untouched and yields `0`.
pub fn to_narrow(dest: &mut [u8], wide: &[u16]) -> usize {
    let Some(capacity) = dest.len().checked_sub(1) else {
        return 0;
    };

    let len = strlen(wide, None).min(capacity);
    for (d, &w) in dest.iter_mut().zip(&wide[..len]) {
        *d = w.to_le_bytes()[0];
    }

    dest[len] = 0;
    len
}

/// Widens each byte of `narrow` (up to its first null) into `dest`, stopping
/// at `dest.len() - 1`, and null-terminates `dest`.
///
/// Returns the number of **bytes** of wide text written, excluding the
/// terminator. A zero-length `dest` is left untouched and yields `0`.
pub fn from_narrow(dest: &mut [u16], narrow: &[u8]) -> usize {
    let Some(capacity) = dest.len().checked_sub(1) else {
        return 0;
    };

    let src_len = narrow.iter().position(|&b| b == 0).unwrap_or(narrow.len());
    let len = src_len.min(capacity);
    for (d, &b) in dest.iter_mut().zip(&narrow[..len]) {
        *d = u16::from(b);
    }

    dest[len] = 0;
    len * CHAR_WIDTH
}

/// Narrows the units yielded by `wide` up to the first null.
pub fn to_narrow_string<I>(wide: I) -> String
where
    I: IntoIterator<Item = u16>,
{
    wide.into_iter()
        .take_while(|&c| c != 0)
        .map(|c| char::from(c.to_le_bytes()[0]))
        .collect()
}

/// Narrows a little-endian UCS-2 byte buffer up to the first null.
#[must_use]
pub fn decode_le(bytes: &[u8]) -> String {
    to_narrow_string(units(bytes))
}

/// Widens every byte of `narrow` and appends a terminator.
#[must_use]
pub fn encode(narrow: &str) -> Vec<u16> {
    narrow
        .bytes()
        .map(u16::from)
        .chain(core::iter::once(0))
        .collect()
}

/// Widens `narrow` and serializes it as little-endian bytes, terminator
/// included.
#[must_use]
pub fn encode_le(narrow: &str) -> Vec<u8> {
    encode(narrow)
        .into_iter()
        .flat_map(u16::to_le_bytes)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(s: &str) -> Vec<u16> {
        encode(s)
    }

    #[test]
    fn strlen_stops_at_terminator() {
        assert_eq!(strlen(&wide("Boot0001"), None), 8);
        assert_eq!(strlen(&[0x41, 0x42, 0, 0x43], None), 2);
    }

    #[test]
    fn strlen_fails_safe() {
        assert_eq!(strlen(&[], None), 0);
        assert_eq!(strlen(&[0, 0x41], None), 0);
        assert_eq!(strlen_le(&[], None), 0);
        assert_eq!(strlen_le(&[0, 0, 0x41, 0], None), 0);
    }

    #[test]
    fn strlen_honors_max_and_buffer_end() {
        let w = wide("abcdef");
        assert_eq!(strlen(&w, Some(3)), 3);
        assert_eq!(strlen(&w, Some(100)), 6);
        // unterminated
        assert_eq!(strlen(&[0x41, 0x42], None), 2);
        assert_eq!(strlen_le(&[0x41, 0, 0x42], None), 1);
    }

    #[test]
    fn strsize_counts_terminator() {
        for n in [0_usize, 1, 255] {
            let s = "x".repeat(n);
            assert_eq!(strsize(&wide(&s)), (n + 1) * CHAR_WIDTH);
            assert_eq!(strsize_le(&encode_le(&s)), (n + 1) * CHAR_WIDTH);
        }
    }

    #[test]
    fn narrow_wide_narrow_is_identity_for_ascii() {
        let text = b"Linux Boot Manager";
        let mut w = [0u16; 64];
        let bytes = from_narrow(&mut w, text);
        assert_eq!(bytes, text.len() * CHAR_WIDTH);

        let mut n = [0u8; 64];
        let chars = to_narrow(&mut n, &w);
        assert_eq!(chars, text.len());
        assert_eq!(&n[..chars], text);
        assert_eq!(n[chars], 0);
    }

    #[test]
    fn conversions_truncate_at_capacity() {
        let mut n = [0xFFu8; 4];
        assert_eq!(to_narrow(&mut n, &wide("abcdef")), 3);
        assert_eq!(&n, b"abc\0");

        let mut w = [0xFFFFu16; 3];
        assert_eq!(from_narrow(&mut w, b"xyz"), 4);
        assert_eq!(w, [u16::from(b'x'), u16::from(b'y'), 0]);
    }

    #[test]
    fn zero_capacity_is_a_no_op() {
        assert_eq!(to_narrow(&mut [], &wide("abc")), 0);
        assert_eq!(from_narrow(&mut [], b"abc"), 0);
    }

    #[test]
    fn narrowing_keeps_low_byte() {
        // U+0141 (Ł) narrows to 0x41 ('A').
        assert_eq!(to_narrow_string([0x0141, 0x0042, 0]), "AB");
        assert_eq!(decode_le(&[0x41, 0x01, 0x42, 0x00, 0, 0, 0x43, 0]), "AB");
    }
}
