use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "uefivars",
    about = "List UEFI variables and decode the well-known ones",
    disable_version_flag = true
)]
pub struct Cli {
    /// Show attribute abbreviations (NV, BS, RT) after each variable name
    #[arg(short, long)]
    pub attributes: bool,

    /// Also list variables that are not decoded
    #[arg(short, long)]
    pub unknown: bool,

    /// Print the version and exit
    #[arg(short, long)]
    pub version: bool,

    /// Kernel interface to read variables from
    #[arg(short, long, value_enum, default_value_t = BackendArg::Auto)]
    pub backend: BackendArg,

    /// Directory to read variables from instead of the interface default
    #[arg(short, long, value_name = "DIR", env = "UEFIVARS_ROOT")]
    pub root: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Log level (off, error, warn, info, debug, trace); overrides -d
    #[arg(long, value_name = "LEVEL", env = "UEFIVARS_LOG")]
    pub log_level: Option<LevelFilter>,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BackendArg {
    /// efivarfs, falling back to the legacy sysfs tree
    Auto,
    /// /sys/firmware/efi/efivars
    Efivarfs,
    /// /sys/firmware/efi/vars
    Sysfs,
}
