use bitfield_struct::bitfield;

/// UEFI variable attribute word.
///
/// Stored little-endian as the first four bytes of every efivarfs file and
/// as the trailing field of a legacy sysfs `raw_var` record.
#[bitfield(u32, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct VariableAttributes {
    /// Bit 0: `EFI_VARIABLE_NON_VOLATILE`: persisted across resets.
    pub non_volatile: bool,

    /// Bit 1: `EFI_VARIABLE_BOOTSERVICE_ACCESS`.
    pub bootservice_access: bool,

    /// Bit 2: `EFI_VARIABLE_RUNTIME_ACCESS`: visible to the OS after
    /// `ExitBootServices()`.
    pub runtime_access: bool,

    /// Bit 3: `EFI_VARIABLE_HARDWARE_ERROR_RECORD`.
    pub hardware_error_record: bool,

    /// Bit 4: `EFI_VARIABLE_AUTHENTICATED_WRITE_ACCESS` (deprecated).
    pub authenticated_write_access: bool,

    /// Bit 5: `EFI_VARIABLE_TIME_BASED_AUTHENTICATED_WRITE_ACCESS`.
    pub time_based_authenticated_write_access: bool,

    /// Bit 6: `EFI_VARIABLE_APPEND_WRITE`.
    pub append_write: bool,

    /// Bit 7: `EFI_VARIABLE_ENHANCED_AUTHENTICATED_ACCESS`.
    pub enhanced_authenticated_access: bool,

    /// Bits 8-31: Reserved; preserved as read.
    #[bits(24)]
    pub reserved: u32,
}

impl VariableAttributes {
    /// The usual set for architecturally defined boot variables.
    pub const NV_BS_RT: Self = Self::new()
        .with_non_volatile(true)
        .with_bootservice_access(true)
        .with_runtime_access(true);

    /// Short names of the access flags that are set, in the fixed order
    /// `NV`, `BS`, `RT`. All other bits are not reported.
    pub fn abbreviations(self) -> impl Iterator<Item = &'static str> {
        [
            (self.non_volatile(), "NV"),
            (self.bootservice_access(), "BS"),
            (self.runtime_access(), "RT"),
        ]
        .into_iter()
        .filter_map(|(set, abbr)| set.then_some(abbr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_positions() {
        let a = VariableAttributes::from_bits(0b111);
        assert!(a.non_volatile());
        assert!(a.bootservice_access());
        assert!(a.runtime_access());
        assert!(!a.hardware_error_record());
        assert_eq!(VariableAttributes::NV_BS_RT.into_bits(), 0x7);
        assert!(VariableAttributes::from_bits(1 << 6).append_write());
    }

    #[test]
    fn reserved_bits_survive() {
        let a = VariableAttributes::from_bits(0xDEAD_0001);
        assert_eq!(a.into_bits(), 0xDEAD_0001);
    }

    #[test]
    fn abbreviations_are_ordered_and_filtered() {
        let all: Vec<_> = VariableAttributes::from_bits(0xFF).abbreviations().collect();
        assert_eq!(all, ["NV", "BS", "RT"]);

        let rt_bs: Vec<_> = VariableAttributes::from_bits(0b110).abbreviations().collect();
        assert_eq!(rt_bs, ["BS", "RT"]);

        assert_eq!(VariableAttributes::from_bits(0x40).abbreviations().count(), 0);
    }
}
