use crate::cli::{BackendArg, Cli};
use efi_vars::BackendPreference;
use log::LevelFilter;
use std::path::PathBuf;

/// Settings for one run, resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub show_attributes: bool,
    pub show_unknown: bool,
    pub backend: BackendPreference,
    pub root: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Config {
    /// Maps the `-d` count onto a level, starting from `warn`.
    const fn verbosity(count: u8) -> LevelFilter {
        match count {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            show_attributes: cli.attributes,
            show_unknown: cli.unknown,
            backend: cli.backend.into(),
            root: cli.root,
            log_level: cli
                .log_level
                .unwrap_or_else(|| Self::verbosity(cli.debug)),
        }
    }
}

impl From<BackendArg> for BackendPreference {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Auto => Self::Auto,
            BackendArg::Efivarfs => Self::Efivarfs,
            BackendArg::Sysfs => Self::Sysfs,
        }
    }
}
