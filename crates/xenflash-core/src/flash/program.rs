//! Program (write) engine and full-chip erase

use crate::bank::BankSelector;
use crate::error::Result;
use crate::flash::{check_image_len, SessionProgress};
use crate::programmer::XeniumDevice;
use crate::region::REGIONS;

/// Number of programmed bytes between progress notifications
pub const PROGRESS_STEP: usize = 1024;

/// Erase the whole chip
///
/// Blocks until the chip reports completion. There is no way to abort once
/// started; cutting power here leaves the device unusable.
pub fn erase_chip<D, P>(selector: &mut BankSelector<'_, D>, progress: &mut P) -> Result<()>
where
    D: XeniumDevice + ?Sized,
    P: SessionProgress + ?Sized,
{
    log::info!("Erasing full 2 MiB flash...");
    progress.erasing();
    selector.erase_chip()?;
    progress.erase_complete();
    Ok(())
}

/// Program a full image, one byte at a time
///
/// Regions are written in ascending order and each region's bank is selected
/// once before its first byte. The chip must have been erased beforehand:
/// programming can only clear bits. Nothing is verified here.
pub fn program<D, P>(
    selector: &mut BankSelector<'_, D>,
    source: &[u8],
    progress: &mut P,
) -> Result<()>
where
    D: XeniumDevice + ?Sized,
    P: SessionProgress + ?Sized,
{
    check_image_len(source.len())?;

    let mut done = 0usize;
    for region in &REGIONS {
        log::info!("  {}...", region.name);
        selector.select(region)?;
        progress.region(region);

        for (bank_addr, &value) in source[region.range()].iter().enumerate() {
            selector.program_byte(region, bank_addr as u32, value)?;
            done += 1;
            if done % PROGRESS_STEP == 0 {
                progress.progress(done);
            }
        }
    }
    Ok(())
}
