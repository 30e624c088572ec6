use efi_types::guid::GUID_TEXT_LEN;
use efi_types::{VariableAttributes, VendorGuid};
use std::fmt;

/// Size of the attribute word in front of every stored payload.
pub const ATTRIBUTES_LEN: usize = 4;

/// Identity of a variable: its name within a vendor GUID namespace.
///
/// On disk both kernel interfaces join the two as `<Name>-<guid>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableName {
    name: String,
    guid: VendorGuid,
}

impl VariableName {
    #[must_use]
    pub fn new(name: impl Into<String>, guid: VendorGuid) -> Self {
        Self {
            name: name.into(),
            guid,
        }
    }

    /// A variable in the [`VendorGuid::GLOBAL_VARIABLE`] namespace.
    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        Self::new(name, VendorGuid::GLOBAL_VARIABLE)
    }

    /// Splits a `<Name>-<guid>` directory entry.
    ///
    /// The GUID is the last 36 characters; the name is everything before the
    /// separating dash and must not be empty. Returns `None` for anything
    /// else.
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let split = file_name.len().checked_sub(GUID_TEXT_LEN + 1)?;
        if split == 0 {
            return None;
        }

        let (name, rest) = file_name.split_at_checked(split)?;
        let guid = rest.strip_prefix('-')?.parse().ok()?;
        Some(Self::new(name, guid))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn guid(&self) -> VendorGuid {
        self.guid
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.guid)
    }
}

/// One variable as read from a store.
///
/// The entry owns its payload; [`Variable::len`] is always the number of
/// bytes actually retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: VariableName,
    pub attributes: VariableAttributes,
    pub data: Vec<u8>,
}

impl Variable {
    #[must_use]
    pub const fn new(name: VariableName, attributes: VariableAttributes, data: Vec<u8>) -> Self {
        Self {
            name,
            attributes,
            data,
        }
    }

    /// Payload length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The efivarfs blob: attributes (LE) followed by the payload.
    #[must_use]
    pub fn to_blob(&self) -> Vec<u8> {
        let mut blob = Vec::with_capacity(ATTRIBUTES_LEN + self.data.len());
        blob.extend_from_slice(&self.attributes.into_bits().to_le_bytes());
        blob.extend_from_slice(&self.data);
        blob
    }
}
