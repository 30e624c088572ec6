//! # efivarfs
//!
//! Each variable is a regular file named `<Name>-<guid>` whose contents are
//! the attribute word (u32, LE) followed by the payload.

use super::{StoreError, VariableStore, list_names, write_record};
use crate::variable::{ATTRIBUTES_LEN, Variable, VariableName};
use efi_types::VariableAttributes;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Permissions of newly created variable files.
const FILE_MODE: u32 = 0o644;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Efivarfs {
    root: PathBuf,
}

impl Efivarfs {
    pub const DEFAULT_ROOT: &'static str = "/sys/firmware/efi/efivars";

    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, name: &VariableName) -> PathBuf {
        self.root.join(name.to_string())
    }

    fn write(&self, path: &Path, var: &Variable) -> Result<(), StoreError> {
        write_record(
            OpenOptions::new().create(true).mode(FILE_MODE),
            path,
            &var.to_blob(),
        )
    }
}

impl Default for Efivarfs {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}

impl VariableStore for Efivarfs {
    fn root(&self) -> &Path {
        &self.root
    }

    fn enumerate(&self) -> Result<Vec<VariableName>, StoreError> {
        list_names(&self.root, |t| t.is_file())
    }

    fn read(&self, name: &VariableName) -> Result<Variable, StoreError> {
        let path = self.path_of(name);
        let mut file = File::open(&path).map_err(|e| StoreError::io(&path, e))?;
        let size = file
            .metadata()
            .map_err(|e| StoreError::io(&path, e))?
            .len();

        let mut header = [0u8; ATTRIBUTES_LEN];
        file.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => StoreError::invalid(
                &path,
                format!("{size} bytes, shorter than the attribute header"),
            ),
            _ => StoreError::io(&path, e),
        })?;
        let attributes = VariableAttributes::from_bits(u32::from_le_bytes(header));

        let expected = usize::try_from(size)
            .ok()
            .and_then(|n| n.checked_sub(ATTRIBUTES_LEN))
            .unwrap_or_default();

        let mut data = Vec::new();
        data.try_reserve_exact(expected)
            .map_err(|e| StoreError::OutOfResources {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        file.read_to_end(&mut data)
            .map_err(|e| StoreError::io(&path, e))?;

        log::debug!("Read {} payload bytes from {}", data.len(), path.display());
        if data.len() < expected {
            return Err(StoreError::invalid(
                &path,
                format!("short read: {} of {expected} payload bytes", data.len()),
            ));
        }

        Ok(Variable::new(name.clone(), attributes, data))
    }

    fn create(&self, var: &Variable) -> Result<(), StoreError> {
        self.write(&self.path_of(&var.name), var)
    }

    fn edit(&self, name: &VariableName, var: &Variable) -> Result<(), StoreError> {
        self.write(&self.path_of(name), var)
    }

    fn delete(&self, var: &Variable) -> Result<(), StoreError> {
        let path = self.path_of(&var.name);
        std::fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { path: path.clone() },
            _ => StoreError::OutOfResources {
                path: path.clone(),
                reason: e.to_string(),
            },
        })?;
        log::debug!("Removed {}", path.display());
        Ok(())
    }
}
