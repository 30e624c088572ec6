//! # Legacy sysfs Variables
//!
//! Kernels before efivarfs expose `/sys/firmware/efi/vars`: a directory per
//! variable holding a `raw_var` file, plus the write-only `new_var` and
//! `del_var` control files. All three carry the same packed record:
//!
//! ```text
//! offset      size   field
//! 0           2048   VariableName (1024 UCS-2 units)
//! 2048        16     VendorGuid
//! 2064        W      DataSize
//! 2064+W      1024   Data
//! 3088+W      W      Status
//! 3088+2W     4      Attributes
//! ```
//!
//! `W` is the kernel's word size, so a record is 3108 bytes on 64-bit
//! kernels and 3100 bytes on 32-bit ones. Integers are little-endian.

use super::{StoreError, VariableStore, list_names, write_record};
use crate::variable::{Variable, VariableName};
use efi_types::{VariableAttributes, VendorGuid};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const NAME_UNITS: usize = 1024;
const NAME_LEN: usize = NAME_UNITS * efi_ucs2::CHAR_WIDTH;
const GUID_LEN: usize = 16;

/// Capacity of the `Data` field.
pub const DATA_CAPACITY: usize = 1024;

const RAW_VAR: &str = "raw_var";
const NEW_VAR: &str = "new_var";
const DEL_VAR: &str = "del_var";

/// Width of `DataSize` and `Status` in a record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WordSize {
    Bits32,
    Bits64,
}

impl WordSize {
    #[cfg(target_pointer_width = "64")]
    pub const HOST: Self = Self::Bits64;
    #[cfg(not(target_pointer_width = "64"))]
    pub const HOST: Self = Self::Bits32;

    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }

    /// Total size of a record using this word size.
    #[must_use]
    pub const fn record_len(self) -> usize {
        NAME_LEN + GUID_LEN + DATA_CAPACITY + 2 * self.bytes() + 4
    }

    /// Infers the word size from the size of a record.
    #[must_use]
    pub const fn from_record_len(len: usize) -> Option<Self> {
        if len == Self::Bits64.record_len() {
            Some(Self::Bits64)
        } else if len == Self::Bits32.record_len() {
            Some(Self::Bits32)
        } else {
            None
        }
    }

    fn read(self, record: &[u8], offset: usize) -> u64 {
        match self {
            Self::Bits32 => {
                let mut b = [0u8; 4];
                b.copy_from_slice(&record[offset..offset + 4]);
                u64::from(u32::from_le_bytes(b))
            }
            Self::Bits64 => {
                let mut b = [0u8; 8];
                b.copy_from_slice(&record[offset..offset + 8]);
                u64::from_le_bytes(b)
            }
        }
    }

    fn write(self, record: &mut Vec<u8>, value: u64) {
        match self {
            Self::Bits32 => {
                // DataSize never exceeds DATA_CAPACITY
                let value = u32::try_from(value).unwrap_or(u32::MAX);
                record.extend_from_slice(&value.to_le_bytes());
            }
            Self::Bits64 => record.extend_from_slice(&value.to_le_bytes()),
        }
    }
}

/// A decoded `raw_var` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVar {
    pub name: String,
    pub guid: VendorGuid,
    pub attributes: VariableAttributes,
    pub data: Vec<u8>,
}

/// Reasons a record is rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RawVarError {
    #[error("record is {0} bytes, expected 3100 or 3108")]
    Size(usize),
    #[error("data size {0} exceeds the 1024-byte data field")]
    DataSize(u64),
}

impl RawVar {
    /// Decodes a record of either word size.
    ///
    /// # Errors
    /// See [`RawVarError`].
    pub fn decode(record: &[u8]) -> Result<Self, RawVarError> {
        let word = WordSize::from_record_len(record.len()).ok_or(RawVarError::Size(record.len()))?;

        let size_at = NAME_LEN + GUID_LEN;
        let data_at = size_at + word.bytes();
        let attributes_at = data_at + DATA_CAPACITY + word.bytes();

        let data_size = word.read(record, size_at);
        let len = usize::try_from(data_size)
            .ok()
            .filter(|&n| n <= DATA_CAPACITY)
            .ok_or(RawVarError::DataSize(data_size))?;

        let mut attributes = [0u8; 4];
        attributes.copy_from_slice(&record[attributes_at..attributes_at + 4]);

        Ok(Self {
            name: efi_ucs2::decode_le(&record[..NAME_LEN]),
            guid: VendorGuid::read(&record[NAME_LEN..]).unwrap_or_default(),
            attributes: VariableAttributes::from_bits(u32::from_le_bytes(attributes)),
            data: record[data_at..data_at + len].to_vec(),
        })
    }

    /// Encodes a record with the given word size. `Status` is written as
    /// zero.
    ///
    /// # Errors
    /// [`RawVarError::DataSize`] if the payload does not fit the data field.
    pub fn encode(var: &Variable, word: WordSize) -> Result<Vec<u8>, RawVarError> {
        let len = var.data.len();
        if len > DATA_CAPACITY {
            return Err(RawVarError::DataSize(len as u64));
        }

        let mut name = [0u16; NAME_UNITS];
        efi_ucs2::from_narrow(&mut name, var.name.name().as_bytes());

        let mut record = Vec::with_capacity(word.record_len());
        record.extend(name.iter().flat_map(|u| u.to_le_bytes()));
        record.extend_from_slice(&var.name.guid().to_bytes());
        word.write(&mut record, len as u64);
        record.extend_from_slice(&var.data);
        record.resize(record.len() + DATA_CAPACITY - len, 0);
        word.write(&mut record, 0);
        record.extend_from_slice(&var.attributes.into_bits().to_le_bytes());
        Ok(record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sysfs {
    root: PathBuf,
}

impl Sysfs {
    pub const DEFAULT_ROOT: &'static str = "/sys/firmware/efi/vars";

    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn raw_var_of(&self, name: &VariableName) -> PathBuf {
        self.root.join(name.to_string()).join(RAW_VAR)
    }

    fn submit(&self, path: &Path, var: &Variable) -> Result<(), StoreError> {
        let record = RawVar::encode(var, WordSize::HOST)
            .map_err(|e| StoreError::invalid(path, e.to_string()))?;
        write_record(&mut OpenOptions::new(), path, &record)
    }
}

impl Default for Sysfs {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}

impl VariableStore for Sysfs {
    fn root(&self) -> &Path {
        &self.root
    }

    fn enumerate(&self) -> Result<Vec<VariableName>, StoreError> {
        list_names(&self.root, fs::FileType::is_dir)
    }

    fn read(&self, name: &VariableName) -> Result<Variable, StoreError> {
        let path = self.raw_var_of(name);
        let record = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        log::debug!("Read {} byte record from {}", record.len(), path.display());

        let raw = RawVar::decode(&record).map_err(|e| StoreError::invalid(&path, e.to_string()))?;
        if raw.name != name.name() || raw.guid != name.guid() {
            log::debug!(
                "{} holds {}-{}",
                path.display(),
                raw.name,
                raw.guid
            );
        }

        Ok(Variable::new(name.clone(), raw.attributes, raw.data))
    }

    fn create(&self, var: &Variable) -> Result<(), StoreError> {
        self.submit(&self.root.join(NEW_VAR), var)
    }

    fn edit(&self, name: &VariableName, var: &Variable) -> Result<(), StoreError> {
        self.submit(&self.raw_var_of(name), var)
    }

    fn delete(&self, var: &Variable) -> Result<(), StoreError> {
        let path = self.root.join(DEL_VAR);
        self.submit(&path, var).map_err(|e| match e {
            StoreError::InvalidFormat { .. } => e,
            other => StoreError::OutOfResources {
                path,
                reason: other.to_string(),
            },
        })
    }
}
