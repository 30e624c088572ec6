//! # EFI Load Options
//!
//! Decoding of `Boot####` variable payloads (`EFI_LOAD_OPTION`) and of the
//! device-path lists they embed.
//!
//! ## Layout
//!
//! ```text
//! offset  size                    field
//! 0       4                       Attributes (u32, LE)
//! 4       2                       FilePathListLength (u16, LE)
//! 6       strsize(Description)    Description (null-terminated UCS-2)
//! 6+d     FilePathListLength      FilePathList (device-path nodes)
//! 6+d+n   remainder               OptionalData
//! ```
//!
//! Only the header is fixed. The description is found by scanning for its
//! terminator, and the optional data is whatever is left after the device
//! path list. All boundaries are checked against the payload length; a
//! payload whose declared fields do not fit is reported as malformed rather
//! than read past its end.
//!
//! ## Modules
//!
//! * [`load_option`]: [`LoadOption::parse`] and [`DecodeError`].
//! * [`attributes`]: the load option attribute word.
//! * [`device_path`]: node iteration and text rendering.
//! * [`text`]: the UCS-2 detection heuristic and raw-byte escaping used for
//!   free-form variable contents.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod attributes;
pub mod device_path;
pub mod load_option;
pub mod text;

pub use attributes::LoadOptionAttributes;
pub use device_path::{DevicePath, DevicePathError, DevicePathNode};
pub use load_option::{DecodeError, LoadOption};
pub use text::TextEncoding;
