//! # uefivars
//!
//! Lists the UEFI variables the kernel exposes and decodes the well-known
//! ones (boot entries, boot order, console devices, language, timeout).

mod classify;
mod cli;
mod config;
mod logger;
mod print;

use crate::cli::Cli;
use crate::config::Config;
use crate::logger::StderrLogger;
use crate::print::Printer;
use anyhow::{Context, Result};
use clap::Parser;
use efi_vars::{Backend, VariableList, VariableStore};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::from(cli);
    StderrLogger::new(config.log_level)
        .init()
        .context("failed to install logger")?;
    log::debug!("{config:?}");

    let backend = Backend::detect(config.backend, config.root.as_deref())
        .context("no UEFI variable store available")?;
    let list = VariableList::load(&backend)
        .with_context(|| format!("failed to enumerate {}", backend.root().display()))?;
    log::info!("Loaded {} variables", list.len());

    Printer::new(&config)
        .print_all(&list, &mut io::stdout().lock())
        .context("failed to write listing")
}
