/// What a variable's payload is, judged by its name alone.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VariableKind {
    /// `Boot####`: an `EFI_LOAD_OPTION`.
    BootEntry,
    /// `BootCurrent`, `BootNext`, `BootOptionSupport`: one u16.
    BootValue,
    /// `BootOrder`: a sequence of u16 boot entry numbers.
    BootOrder,
    /// `ConIn`, `ConOut`, `ErrOut` and their `*Dev` forms: a device path.
    ConsoleDevice,
    /// `Lang`, `PlatformLang` and their `*Codes` lists: text.
    Language,
    /// `Timeout`: one u16, in seconds.
    Timeout,
    Unknown,
}

impl VariableKind {
    #[must_use]
    pub fn of(name: &str) -> Self {
        match name {
            "BootCurrent" | "BootNext" | "BootOptionSupport" => Self::BootValue,
            "BootOrder" => Self::BootOrder,
            "ConIn" | "ConInDev" | "ConOut" | "ConOutDev" | "ErrOut" | "ErrOutDev" => {
                Self::ConsoleDevice
            }
            "Lang" | "PlatformLang" | "LangCodes" | "PlatformLangCodes" => Self::Language,
            "Timeout" => Self::Timeout,
            _ if boot_entry_label(name).is_some() => Self::BootEntry,
            _ => Self::Unknown,
        }
    }
}

/// The `Boot####` prefix of `name`, if it has one.
#[must_use]
pub fn boot_entry_label(name: &str) -> Option<&str> {
    let label = name.get(..8)?;
    let digits = label.strip_prefix("Boot")?;
    digits
        .bytes()
        .all(|b| b.is_ascii_hexdigit())
        .then_some(label)
}
