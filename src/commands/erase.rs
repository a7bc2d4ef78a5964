//! Erase command

use std::io::{self, BufRead, Write};
use xenflash_core::flash;
use xenflash_core::probe;

use super::{with_device, CommandResult, IndicatifProgress};

fn confirm() -> io::Result<bool> {
    print!("This erases the whole 2 MiB flash, including XeniumOS. Continue? [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

/// Erase the whole chip
pub fn run(programmer: &str, yes: bool) -> CommandResult {
    if !yes && !confirm()? {
        println!("Aborted");
        return Ok(());
    }

    with_device(programmer, |selector| {
        let identity = probe::require_device(selector)?;
        log::info!("Device detected ({})", identity);

        let mut progress = IndicatifProgress::new();
        flash::erase_chip(selector, &mut progress)?;
        println!("Erase complete");
        Ok(())
    })
}
