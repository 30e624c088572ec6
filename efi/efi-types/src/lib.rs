//! # Firmware Variable Identity and Attributes
//!
//! Small, allocation-free types shared by every layer that touches UEFI
//! variables:
//!
//! * [`VendorGuid`]: the 128-bit namespace of a variable, with the
//!   mixed-endian text rendering used by firmware and the kernel.
//! * [`VariableAttributes`]: the 32-bit attribute word stored in front of
//!   every variable payload.

#![cfg_attr(not(any(test, doctest)), no_std)]

pub mod attributes;
pub mod guid;

pub use attributes::VariableAttributes;
pub use guid::{GuidParseError, VendorGuid};
