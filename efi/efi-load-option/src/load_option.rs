use crate::attributes::LoadOptionAttributes;
use crate::device_path::DevicePath;
use crate::text;
use alloc::string::String;

/// Size of the fixed `Attributes` + `FilePathListLength` header.
pub const HEADER_LEN: usize = 6;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("load option truncated: {actual} bytes, the header alone needs 6")]
    Truncated { actual: usize },
    #[error("load option malformed: its fields need {needed} bytes, the payload has {actual}")]
    Malformed { needed: usize, actual: usize },
}

/// A decoded `EFI_LOAD_OPTION`, borrowing its variable-length parts from
/// the payload it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOption<'a> {
    pub attributes: LoadOptionAttributes,
    /// Declared byte length of [`Self::file_path_list`].
    pub file_path_list_length: u16,
    /// Narrowed description.
    pub description: String,
    pub file_path_list: &'a [u8],
    pub optional_data: &'a [u8],
}

impl<'a> LoadOption<'a> {
    /// Decodes a `Boot####` payload.
    ///
    /// # Errors
    /// * [`DecodeError::Truncated`] if the payload cannot hold the 6-byte
    ///   header.
    /// * [`DecodeError::Malformed`] if the description is unterminated or the
    ///   declared device path list runs past the end of the payload.
    pub fn parse(payload: &'a [u8]) -> Result<Self, DecodeError> {
        let actual = payload.len();
        let [a0, a1, a2, a3, l0, l1, ..] = *payload else {
            return Err(DecodeError::Truncated { actual });
        };

        let attributes = LoadOptionAttributes::from_bits(u32::from_le_bytes([a0, a1, a2, a3]));
        let file_path_list_length = u16::from_le_bytes([l0, l1]);

        let rest = &payload[HEADER_LEN..];
        let description_size = description_size(rest).ok_or(DecodeError::Malformed {
            needed: HEADER_LEN + efi_ucs2::strsize_le(rest),
            actual,
        })?;

        let path_start = HEADER_LEN + description_size;
        let path_end = path_start + usize::from(file_path_list_length);
        if path_end > actual {
            return Err(DecodeError::Malformed {
                needed: path_end,
                actual,
            });
        }

        // payload_length - file_path_list_length - bytes before the list
        let optional_len = actual
            .checked_sub(usize::from(file_path_list_length))
            .and_then(|n| n.checked_sub(path_start))
            .ok_or(DecodeError::Malformed {
                needed: path_end,
                actual,
            })?;

        Ok(Self {
            attributes,
            file_path_list_length,
            description: efi_ucs2::decode_le(&rest[..description_size]),
            file_path_list: &payload[path_start..path_end],
            optional_data: &payload[path_end..path_end + optional_len],
        })
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.attributes.active()
    }

    #[must_use]
    pub const fn device_path(&self) -> DevicePath<'a> {
        DevicePath::new(self.file_path_list)
    }

    /// Text form of the device path list.
    #[must_use]
    pub fn device_path_text(&self) -> String {
        self.device_path().to_text()
    }

    /// The optional data with non-printable bytes escaped.
    #[must_use]
    pub fn optional_data_text(&self) -> String {
        text::escape_raw(self.optional_data)
    }
}

/// Byte size of the description at the start of `rest`, terminator included.
///
/// A terminator cut down to a single zero byte by the end of the payload is
/// accepted; any other unterminated description is not.
fn description_size(rest: &[u8]) -> Option<usize> {
    let size = efi_ucs2::strsize_le(rest);
    if size <= rest.len() {
        return Some(size);
    }

    let truncated_terminator = rest.len() == size - 1 && rest.last() == Some(&0);
    truncated_terminator.then_some(size - 1)
}
