//! # Listing
//!
//! One line per variable, in the formats below. `<attrs>` is empty unless
//! attributes were requested, in which case it is ` (NV,BS,RT)` restricted
//! to the flags that are set.
//!
//! ```text
//! Boot0001<attrs>:* Description\tDevicePath OptionalData
//! BootCurrent<attrs>: 0001
//! BootOrder<attrs>: 0001,0003
//! ConOut<attrs>: PciRoot(0x0)/Pci(0x2,0x0)
//! Lang<attrs>: eng
//! Timeout<attrs>: 5 secs
//! Name<attrs>: UNKNOWN
//! ```
//!
//! Payloads too short for their category render as
//! `Name<attrs>: <undecodable: reason>`.

use crate::classify::{VariableKind, boot_entry_label};
use crate::config::Config;
use efi_load_option::{DevicePath, LoadOption, text};
use efi_types::VariableAttributes;
use efi_vars::{Variable, VariableList};
use std::fmt::{self, Write as _};
use std::io;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Printer {
    show_attributes: bool,
    show_unknown: bool,
}

impl Printer {
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self {
            show_attributes: config.show_attributes,
            show_unknown: config.show_unknown,
        }
    }

    /// Writes one line per listed variable to `out`.
    pub fn print_all<W: io::Write>(&self, list: &VariableList, out: &mut W) -> io::Result<()> {
        for var in list {
            if let Some(line) = self.render(var) {
                writeln!(out, "{line}")?;
            }
        }
        out.flush()
    }

    /// The line for `var`, or `None` if it is not shown.
    #[must_use]
    pub fn render(&self, var: &Variable) -> Option<String> {
        let name = var.name.name();
        let attrs = self.attributes(var.attributes);
        let data = var.data.as_slice();

        let line = match VariableKind::of(name) {
            VariableKind::BootEntry => {
                let label = boot_entry_label(name).unwrap_or(name);
                match LoadOption::parse(data) {
                    Ok(opt) => format!(
                        "{label}{attrs}:{}{}\t{}{}",
                        if opt.is_active() { "* " } else { "  " },
                        opt.description,
                        opt.device_path_text(),
                        opt.optional_data_text()
                    ),
                    Err(e) => undecodable(label, &attrs, &e),
                }
            }
            VariableKind::BootValue => match read_u16(data) {
                Some(value) => format!("{name}{attrs}: {value:04X}"),
                None => undecodable(name, &attrs, &ShortPayload(data.len())),
            },
            VariableKind::BootOrder => {
                let mut line = format!("{name}{attrs}: ");
                for (i, entry) in data.chunks_exact(2).enumerate() {
                    if i > 0 {
                        line.push(',');
                    }
                    let _ = write!(line, "{:04X}", u16::from_le_bytes([entry[0], entry[1]]));
                }
                line
            }
            VariableKind::ConsoleDevice => {
                format!("{name}{attrs}: {}", DevicePath::new(data).to_text())
            }
            VariableKind::Language => format!("{name}{attrs}: {}", text::decode_text(data)),
            VariableKind::Timeout => match read_u16(data) {
                Some(secs) => format!("{name}{attrs}: {secs} secs"),
                None => undecodable(name, &attrs, &ShortPayload(data.len())),
            },
            VariableKind::Unknown if self.show_unknown => format!("{name}{attrs}: UNKNOWN"),
            VariableKind::Unknown => {
                log::trace!("Not showing {}", var.name);
                return None;
            }
        };

        Some(line)
    }

    fn attributes(&self, attributes: VariableAttributes) -> String {
        if !self.show_attributes {
            return String::new();
        }

        let flags: Vec<_> = attributes.abbreviations().collect();
        if flags.is_empty() {
            String::new()
        } else {
            format!(" ({})", flags.join(","))
        }
    }
}

fn read_u16(data: &[u8]) -> Option<u16> {
    match *data {
        [lo, hi, ..] => Some(u16::from_le_bytes([lo, hi])),
        _ => None,
    }
}

fn undecodable(label: &str, attrs: &str, reason: &dyn fmt::Display) -> String {
    log::debug!("Cannot decode {label}: {reason}");
    format!("{label}{attrs}: <undecodable: {reason}>")
}

struct ShortPayload(usize);

impl fmt::Display for ShortPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload is {} bytes, expected 2", self.0)
    }
}
