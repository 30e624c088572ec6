use bitfield_struct::bitfield;

/// `EFI_LOAD_OPTION.Attributes`.
#[bitfield(u32, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct LoadOptionAttributes {
    /// Bit 0: `LOAD_OPTION_ACTIVE`. Inactive options are skipped by the
    /// boot manager.
    pub active: bool,

    /// Bit 1: `LOAD_OPTION_FORCE_RECONNECT`.
    pub force_reconnect: bool,

    /// Bit 2: Reserved.
    pub reserved0: bool,

    /// Bit 3: `LOAD_OPTION_HIDDEN`.
    pub hidden: bool,

    /// Bits 4-7: Reserved.
    #[bits(4)]
    pub reserved1: u8,

    /// Bits 8-12: `LOAD_OPTION_CATEGORY`.
    #[bits(5)]
    pub category: u8,

    /// Bits 13-31: Reserved.
    #[bits(19)]
    pub reserved2: u32,
}

impl LoadOptionAttributes {
    pub const CATEGORY_BOOT: u8 = 0x00;
    pub const CATEGORY_APP: u8 = 0x01;

    /// Whether the option is an application rather than a boot target.
    #[must_use]
    pub const fn is_application(self) -> bool {
        self.category() == Self::CATEGORY_APP
    }
}
