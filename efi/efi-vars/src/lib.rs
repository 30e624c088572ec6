//! # UEFI Variables as Exposed by Linux
//!
//! The kernel publishes firmware variables through one of two filesystem
//! interfaces. This crate reads and writes them through a common
//! [`VariableStore`] trait:
//!
//! * [`Efivarfs`]: one file per variable under `/sys/firmware/efi/efivars`,
//!   holding the 4-byte attribute word followed by the payload.
//! * [`Sysfs`]: the legacy `/sys/firmware/efi/vars` tree, one directory per
//!   variable with a fixed-size `raw_var` record.
//!
//! [`Backend`] picks one of them at startup. [`VariableList::load`] builds
//! the ordered list of all readable variables of a store.
//!
//! Both interfaces name their entries `<Name>-<guid>`; see [`VariableName`].

pub mod list;
pub mod store;
pub mod variable;

pub use list::VariableList;
pub use store::efivarfs::Efivarfs;
pub use store::sysfs::Sysfs;
pub use store::{Backend, BackendPreference, StoreError, VariableStore};
pub use variable::{Variable, VariableName};
