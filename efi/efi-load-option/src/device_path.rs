//! # Device Paths
//!
//! A device path is a packed sequence of variable-length nodes:
//!
//! ```text
//! +------+---------+-------------+----------------------+
//! | type | subtype | length (LE) | data (length - 4)    |
//! +------+---------+-------------+----------------------+
//!   u8      u8         u16
//! ```
//!
//! The list ends with an End-Entire node (`0x7F/0xFF`). Lists holding more
//! than one instance (e.g. `ConOut` with several consoles) separate them with
//! End-Instance nodes (`0x7F/0x01`).
//!
//! Text rendering follows the UEFI device-path text conventions for a small
//! set of common nodes and falls back to the generic `Path(type,subtype,hex)`
//! form for everything else.

use alloc::string::String;
use core::fmt::{self, Write};
use efi_types::VendorGuid;

/// Size of the `{type, subtype, length}` header in front of every node.
pub const NODE_HEADER_LEN: usize = 4;

/// Device path node types.
pub mod node_type {
    /// Hardware Device Path.
    pub const HARDWARE: u8 = 0x01;
    /// ACPI Device Path.
    pub const ACPI: u8 = 0x02;
    /// Messaging Device Path.
    pub const MESSAGING: u8 = 0x03;
    /// Media Device Path.
    pub const MEDIA: u8 = 0x04;
    /// BIOS Boot Specification Device Path.
    pub const BIOS_BOOT_SPEC: u8 = 0x05;
    /// End of Hardware Device Path.
    pub const END: u8 = 0x7F;
}

/// Sub-types of [`node_type::END`].
pub mod end_sub_type {
    pub const INSTANCE: u8 = 0x01;
    pub const ENTIRE: u8 = 0xFF;
}

mod sub_type {
    pub const HW_PCI: u8 = 0x01;
    pub const HW_VENDOR: u8 = 0x04;
    pub const ACPI_ACPI: u8 = 0x01;
    pub const MSG_USB: u8 = 0x05;
    pub const MSG_VENDOR: u8 = 0x0A;
    pub const MSG_MAC: u8 = 0x0B;
    pub const MSG_SATA: u8 = 0x12;
    pub const MSG_NVME: u8 = 0x17;
    pub const MEDIA_HARD_DRIVE: u8 = 0x01;
    pub const MEDIA_CDROM: u8 = 0x02;
    pub const MEDIA_VENDOR: u8 = 0x03;
    pub const MEDIA_FILE_PATH: u8 = 0x04;
    pub const MEDIA_FV_FILE: u8 = 0x06;
    pub const MEDIA_FV: u8 = 0x07;
    pub const BBS_BBS101: u8 = 0x01;
}

/// Compressed EISA id of the `PNP` vendor prefix.
const EISA_PNP: u32 = 0x41D0;
const PNP_PCI_ROOT: u32 = 0x0A03;
const PNP_PCIE_ROOT: u32 = 0x0A08;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DevicePathError {
    #[error("device path truncated at offset {offset}: {remaining} bytes cannot hold a node header")]
    TruncatedHeader { offset: usize, remaining: usize },
    #[error("device path node at offset {offset} declares length {length}, below the node header size")]
    ShortNode { offset: usize, length: u16 },
    #[error("device path node at offset {offset} declares length {length}, only {remaining} bytes remain")]
    Overrun {
        offset: usize,
        length: u16,
        remaining: usize,
    },
}

impl DevicePathError {
    /// Offset of the offending node within the list.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match *self {
            Self::TruncatedHeader { offset, .. }
            | Self::ShortNode { offset, .. }
            | Self::Overrun { offset, .. } => offset,
        }
    }
}

/// A single node borrowed from a device-path list.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DevicePathNode<'a> {
    pub node_type: u8,
    pub sub_type: u8,
    /// Node payload, excluding the 4-byte header.
    pub data: &'a [u8],
}

/// A device-path list borrowed from a variable payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DevicePath<'a> {
    bytes: &'a [u8],
}

/// Iterator over the nodes of a [`DevicePath`].
///
/// Ends at the End-Entire node (which is not yielded) or at the end of the
/// buffer. After yielding an error the iterator is exhausted.
pub struct Nodes<'a> {
    bytes: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> DevicePath<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[must_use]
    pub const fn nodes(&self) -> Nodes<'a> {
        Nodes {
            bytes: self.bytes,
            offset: 0,
            done: false,
        }
    }

    /// Renders the list as `/`-separated node text, with `,` between
    /// instances. A malformed node stops the walk and the unread remainder is
    /// shown as `Malformed(hex)`.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let mut sep = "";
        for item in self.nodes() {
            match item {
                Ok(node) if node.is_end_instance() => {
                    out.push(',');
                    sep = "";
                }
                Ok(node) => {
                    let _ = write!(out, "{sep}{node}");
                    sep = "/";
                }
                Err(e) => {
                    let rest = self.bytes.get(e.offset()..).unwrap_or_default();
                    let _ = write!(out, "{sep}Malformed({})", hex::encode(rest));
                }
            }
        }
        out
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = Result<DevicePathNode<'a>, DevicePathError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let offset = self.offset;
        let rest = &self.bytes[offset..];
        if rest.is_empty() {
            self.done = true;
            return None;
        }

        let [ty, sub, lo, hi, ..] = *rest else {
            self.done = true;
            return Some(Err(DevicePathError::TruncatedHeader {
                offset,
                remaining: rest.len(),
            }));
        };

        let length = u16::from_le_bytes([lo, hi]);
        let len = usize::from(length);
        if len < NODE_HEADER_LEN {
            self.done = true;
            return Some(Err(DevicePathError::ShortNode { offset, length }));
        }
        if len > rest.len() {
            self.done = true;
            return Some(Err(DevicePathError::Overrun {
                offset,
                length,
                remaining: rest.len(),
            }));
        }

        self.offset += len;
        if ty == node_type::END && sub == end_sub_type::ENTIRE {
            self.done = true;
            return None;
        }

        Some(Ok(DevicePathNode {
            node_type: ty,
            sub_type: sub,
            data: &rest[NODE_HEADER_LEN..len],
        }))
    }
}

impl core::iter::FusedIterator for Nodes<'_> {}

impl DevicePathNode<'_> {
    #[must_use]
    pub const fn is_end_instance(&self) -> bool {
        self.node_type == node_type::END && self.sub_type == end_sub_type::INSTANCE
    }

    fn fmt_known(&self, f: &mut fmt::Formatter<'_>) -> Option<fmt::Result> {
        use node_type::{ACPI, BIOS_BOOT_SPEC, HARDWARE, MEDIA, MESSAGING};
        use sub_type::{
            ACPI_ACPI, BBS_BBS101, HW_PCI, HW_VENDOR, MEDIA_CDROM, MEDIA_FILE_PATH, MEDIA_FV,
            MEDIA_FV_FILE, MEDIA_HARD_DRIVE, MEDIA_VENDOR, MSG_MAC, MSG_NVME, MSG_SATA, MSG_USB,
            MSG_VENDOR,
        };

        let d = self.data;
        match (self.node_type, self.sub_type) {
            (HARDWARE, HW_PCI) => {
                let (function, device) = (*d.first()?, *d.get(1)?);
                Some(write!(f, "Pci(0x{device:X},0x{function:X})"))
            }
            (ACPI, ACPI_ACPI) => {
                let (hid, uid) = (le_u32(d, 0)?, le_u32(d, 4)?);
                Some(fmt_acpi(f, hid, uid))
            }
            (MESSAGING, MSG_USB) => {
                let (port, interface) = (*d.first()?, *d.get(1)?);
                Some(write!(f, "USB(0x{port:X},0x{interface:X})"))
            }
            (MESSAGING, MSG_MAC) => {
                let mac = d.get(..6)?;
                let if_type = *d.get(32)?;
                Some(write!(f, "MAC({},0x{if_type:X})", hex::encode(mac)))
            }
            (MESSAGING, MSG_SATA) => {
                let (hba, pm, lun) = (le_u16(d, 0)?, le_u16(d, 2)?, le_u16(d, 4)?);
                Some(write!(f, "Sata(0x{hba:X},0x{pm:X},0x{lun:X})"))
            }
            (MESSAGING, MSG_NVME) => {
                let nsid = le_u32(d, 0)?;
                let eui = d.get(4..12)?;
                Some(fmt_nvme(f, nsid, eui))
            }
            (MEDIA, MEDIA_HARD_DRIVE) => fmt_hard_drive(f, d),
            (MEDIA, MEDIA_CDROM) => {
                let (entry, start, size) = (le_u32(d, 0)?, le_u64(d, 4)?, le_u64(d, 12)?);
                Some(write!(f, "CDROM(0x{entry:X},0x{start:X},0x{size:X})"))
            }
            (MEDIA, MEDIA_FILE_PATH) => Some(write!(f, "File({})", efi_ucs2::decode_le(d))),
            (MEDIA, MEDIA_FV_FILE) => Some(write!(f, "FvFile({})", VendorGuid::read(d)?)),
            (MEDIA, MEDIA_FV) => Some(write!(f, "FvVol({})", VendorGuid::read(d)?)),
            (HARDWARE, HW_VENDOR) => fmt_vendor(f, "VenHw", d),
            (MESSAGING, MSG_VENDOR) => fmt_vendor(f, "VenMsg", d),
            (MEDIA, MEDIA_VENDOR) => fmt_vendor(f, "VenMedia", d),
            (BIOS_BOOT_SPEC, BBS_BBS101) => {
                let (device_type, status) = (le_u16(d, 0)?, le_u16(d, 2)?);
                let description: String = d
                    .get(4..)?
                    .iter()
                    .take_while(|&&b| b != 0)
                    .map(|&b| char::from(b))
                    .collect();
                Some(write!(
                    f,
                    "BBS(0x{device_type:X},{description},0x{status:X})"
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for DevicePathNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_known(f).unwrap_or_else(|| {
            write!(
                f,
                "Path({},{},{})",
                self.node_type,
                self.sub_type,
                hex::encode(self.data)
            )
        })
    }
}

fn fmt_acpi(f: &mut fmt::Formatter<'_>, hid: u32, uid: u32) -> fmt::Result {
    if hid & 0xFFFF == EISA_PNP {
        match hid >> 16 {
            PNP_PCI_ROOT => write!(f, "PciRoot(0x{uid:X})"),
            PNP_PCIE_ROOT => write!(f, "PcieRoot(0x{uid:X})"),
            product => write!(f, "Acpi(PNP{product:04X},0x{uid:X})"),
        }
    } else {
        write!(f, "Acpi(0x{hid:08X},0x{uid:X})")
    }
}

fn fmt_nvme(f: &mut fmt::Formatter<'_>, nsid: u32, eui: &[u8]) -> fmt::Result {
    write!(f, "NVMe(0x{nsid:X},")?;
    for (i, b) in eui.iter().enumerate() {
        if i > 0 {
            f.write_char('-')?;
        }
        write!(f, "{b:02X}")?;
    }
    f.write_char(')')
}

/// `HD(partition,MBR|GPT,signature,start,size)`.
fn fmt_hard_drive(f: &mut fmt::Formatter<'_>, d: &[u8]) -> Option<fmt::Result> {
    const MBR: u8 = 0x01;
    const GPT: u8 = 0x02;
    const SIG_MBR: u8 = 0x01;
    const SIG_GUID: u8 = 0x02;

    let partition = le_u32(d, 0)?;
    let start = le_u64(d, 4)?;
    let size = le_u64(d, 12)?;
    let signature = d.get(20..36)?;
    let format = *d.get(36)?;
    let signature_type = *d.get(37)?;

    let result = match (format, signature_type) {
        (GPT, SIG_GUID) => write!(
            f,
            "HD({partition},GPT,{},0x{start:X},0x{size:X})",
            VendorGuid::read(signature)?
        ),
        (MBR, SIG_MBR) => write!(
            f,
            "HD({partition},MBR,0x{:X},0x{start:X},0x{size:X})",
            le_u32(signature, 0)?
        ),
        _ => write!(
            f,
            "HD({partition},{format},{signature_type},0x{start:X},0x{size:X})"
        ),
    };
    Some(result)
}

fn fmt_vendor(f: &mut fmt::Formatter<'_>, name: &str, d: &[u8]) -> Option<fmt::Result> {
    let guid = VendorGuid::read(d)?;
    let extra = &d[16..];
    Some(if extra.is_empty() {
        write!(f, "{name}({guid})")
    } else {
        write!(f, "{name}({guid},{})", hex::encode(extra))
    })
}

fn le_u16(d: &[u8], off: usize) -> Option<u16> {
    let s = d.get(off..off.checked_add(2)?)?;
    Some(u16::from_le_bytes([s[0], s[1]]))
}

fn le_u32(d: &[u8], off: usize) -> Option<u32> {
    let s = d.get(off..off.checked_add(4)?)?;
    Some(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
}

fn le_u64(d: &[u8], off: usize) -> Option<u64> {
    let s = d.get(off..off.checked_add(8)?)?;
    Some(u64::from_le_bytes([
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7],
    ]))
}
