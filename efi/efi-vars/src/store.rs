//! # Variable Stores
//!
//! A [`VariableStore`] maps [`VariableName`]s to files below a root
//! directory. Every call opens, uses and closes its own file handle; no
//! buffers or descriptors are kept between calls.

pub mod efivarfs;
pub mod sysfs;

use crate::variable::{Variable, VariableName};
use efivarfs::Efivarfs;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use sysfs::Sysfs;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{}: not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("{}: {reason}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },
    #[error("{}: out of resources: {reason}", .path.display())]
    OutOfResources { path: PathBuf, reason: String },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Classifies an OS error raised while accessing `path`.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::OutOfMemory => Self::OutOfResources {
                path,
                reason: source.to_string(),
            },
            _ => Self::Io { path, source },
        }
    }

    pub(crate) fn invalid(path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// The file or directory the failed operation touched.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::InvalidFormat { path, .. }
            | Self::OutOfResources { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Named access to the variables of one kernel interface.
pub trait VariableStore {
    /// Directory the store operates under.
    fn root(&self) -> &Path;

    /// Lists the variables present, sorted by their on-disk name.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the root directory is absent.
    fn enumerate(&self) -> Result<Vec<VariableName>, StoreError>;

    /// Reads one variable.
    ///
    /// # Errors
    /// * [`StoreError::NotFound`] if there is no such variable.
    /// * [`StoreError::InvalidFormat`] if the stored record is too short or
    ///   otherwise unreadable.
    /// * [`StoreError::OutOfResources`] if the payload buffer cannot be
    ///   allocated.
    fn read(&self, name: &VariableName) -> Result<Variable, StoreError>;

    /// Writes a new variable named after `var.name`.
    ///
    /// # Errors
    /// [`StoreError::InvalidFormat`] if the record was only partially
    /// written.
    fn create(&self, var: &Variable) -> Result<(), StoreError>;

    /// Replaces the contents of the variable `name` with `var`.
    ///
    /// # Errors
    /// [`StoreError::InvalidFormat`] if the record was only partially
    /// written.
    fn edit(&self, name: &VariableName, var: &Variable) -> Result<(), StoreError>;

    /// Removes `var` from the store.
    ///
    /// # Errors
    /// [`StoreError::OutOfResources`] if the removal fails for a reason other
    /// than the variable being absent.
    fn delete(&self, var: &Variable) -> Result<(), StoreError>;
}

/// Which interface [`Backend::detect`] may choose.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum BackendPreference {
    /// efivarfs if mounted, the legacy sysfs tree otherwise.
    #[default]
    Auto,
    Efivarfs,
    Sysfs,
}

/// The store selected for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Efivarfs(Efivarfs),
    Sysfs(Sysfs),
}

impl Backend {
    /// Probes for a usable root directory.
    ///
    /// `root` replaces the default location of the preferred interface; in
    /// [`BackendPreference::Auto`] mode it stands in for the efivarfs root.
    /// Only `Auto` without an explicit `root` falls back to the legacy tree.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] naming the first probed root if none of the
    /// candidates is a readable directory.
    pub fn detect(preference: BackendPreference, root: Option<&Path>) -> Result<Self, StoreError> {
        let root_or = |default: &str| root.map_or_else(|| PathBuf::from(default), Path::to_path_buf);

        let candidates = match (preference, root) {
            (BackendPreference::Auto, None) => vec![
                Self::Efivarfs(Efivarfs::new(Efivarfs::DEFAULT_ROOT)),
                Self::Sysfs(Sysfs::new(Sysfs::DEFAULT_ROOT)),
            ],
            (BackendPreference::Auto | BackendPreference::Efivarfs, _) => {
                vec![Self::Efivarfs(Efivarfs::new(root_or(Efivarfs::DEFAULT_ROOT)))]
            }
            (BackendPreference::Sysfs, _) => {
                vec![Self::Sysfs(Sysfs::new(root_or(Sysfs::DEFAULT_ROOT)))]
            }
        };

        let first = candidates[0].root().to_path_buf();
        for candidate in candidates {
            if probe(candidate.root()) {
                log::info!(
                    "Using {} store at {}",
                    candidate.kind(),
                    candidate.root().display()
                );
                return Ok(candidate);
            }
            log::debug!(
                "No {} store at {}",
                candidate.kind(),
                candidate.root().display()
            );
        }

        Err(StoreError::NotFound { path: first })
    }

    /// Short name of the interface.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Efivarfs(_) => "efivarfs",
            Self::Sysfs(_) => "sysfs",
        }
    }

    fn store(&self) -> &dyn VariableStore {
        match self {
            Self::Efivarfs(s) => s,
            Self::Sysfs(s) => s,
        }
    }
}

impl VariableStore for Backend {
    fn root(&self) -> &Path {
        self.store().root()
    }

    fn enumerate(&self) -> Result<Vec<VariableName>, StoreError> {
        self.store().enumerate()
    }

    fn read(&self, name: &VariableName) -> Result<Variable, StoreError> {
        self.store().read(name)
    }

    fn create(&self, var: &Variable) -> Result<(), StoreError> {
        self.store().create(var)
    }

    fn edit(&self, name: &VariableName, var: &Variable) -> Result<(), StoreError> {
        self.store().edit(name, var)
    }

    fn delete(&self, var: &Variable) -> Result<(), StoreError> {
        self.store().delete(var)
    }
}

/// Whether `root` is a directory we can list.
fn probe(root: &Path) -> bool {
    fs::read_dir(root).is_ok()
}

/// Lists the entries of `root` that pass `keep` and parse as
/// `<Name>-<guid>`, sorted by file name.
pub(crate) fn list_names(
    root: &Path,
    keep: impl Fn(&fs::FileType) -> bool,
) -> Result<Vec<VariableName>, StoreError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| StoreError::io(root, e))? {
        let entry = entry.map_err(|e| StoreError::io(root, e))?;
        let file_type = entry.file_type().map_err(|e| StoreError::io(&entry.path(), e))?;
        if !keep(&file_type) {
            log::trace!("Ignoring {}", entry.path().display());
            continue;
        }

        let parsed = entry
            .file_name()
            .to_str()
            .and_then(VariableName::parse);
        match parsed {
            Some(name) => names.push(name),
            None => log::debug!("Ignoring {}: not a variable name", entry.path().display()),
        }
    }

    names.sort_by_cached_key(ToString::to_string);
    Ok(names)
}

/// Writes `record` to `path` with a single `write` call.
pub(crate) fn write_record(
    options: &mut OpenOptions,
    path: &Path,
    record: &[u8],
) -> Result<(), StoreError> {
    let mut file = options
        .write(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    write_once(&mut file, path, record)
}

/// Issues one `write` of `record`. A failed write is `OutOfResources`, a
/// short one `InvalidFormat`.
fn write_once<W: Write>(out: &mut W, path: &Path, record: &[u8]) -> Result<(), StoreError> {
    let written = out.write(record).map_err(|e| StoreError::OutOfResources {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    log::debug!("Wrote {written} of {} bytes to {}", record.len(), path.display());

    if written != record.len() {
        return Err(StoreError::invalid(
            path,
            format!("partial write: {written} of {} bytes", record.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `limit` bytes per call.
    struct Narrow {
        limit: usize,
        taken: Vec<u8>,
    }

    impl Write for Narrow {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.taken.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Failing;

    impl Write for Failing {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::StorageFull))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_write_is_invalid_format() {
        let mut out = Narrow {
            limit: 3,
            taken: Vec::new(),
        };
        let result = write_once(&mut out, Path::new("var"), &[7, 0, 0, 0, 1, 0]);
        assert!(matches!(result, Err(StoreError::InvalidFormat { .. })));
        assert_eq!(out.taken, [7, 0, 0]);
    }

    #[test]
    fn full_write_succeeds() {
        let mut out = Narrow {
            limit: usize::MAX,
            taken: Vec::new(),
        };
        write_once(&mut out, Path::new("var"), &[7, 0, 0, 0]).unwrap();
        assert_eq!(out.taken, [7, 0, 0, 0]);
    }

    #[test]
    fn failed_write_is_out_of_resources() {
        let result = write_once(&mut Failing, Path::new("var"), &[7, 0, 0, 0]);
        match result {
            Err(StoreError::OutOfResources { path, .. }) => assert_eq!(path, Path::new("var")),
            other => panic!("expected OutOfResources, got {other:?}"),
        }
    }
}
