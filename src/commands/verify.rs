//! Verify command

use std::path::Path;
use xenflash_core::flash::{self, SessionProgress, Verification};
use xenflash_core::image::FlashImage;
use xenflash_core::probe;
use xenflash_core::region::FLASH_SIZE;
use xenflash_core::Error;

use super::{with_device, CommandResult, IndicatifProgress};

/// Compare the flash against the image at `input`
///
/// The write-protected sector is ignored, as it is after a write.
pub fn run(programmer: &str, input: &Path) -> CommandResult {
    let mut source = FlashImage::from_file(input).map_err(|e| {
        log::error!("{}", e);
        Error::SourceUnavailable
    })?;

    with_device(programmer, |selector| {
        let identity = probe::require_device(selector)?;
        log::info!("Device detected ({})", identity);

        let mut progress = IndicatifProgress::new();
        let mut readback = FlashImage::blank();
        progress.verifying(FLASH_SIZE);
        flash::dump(selector, &mut readback, &mut progress)?;

        let outcome = flash::verify(&mut source, &mut readback)?;
        progress.complete(outcome);
        match outcome {
            Verification::Verified => {
                println!("Flash verified");
                Ok(())
            }
            Verification::Mismatch => {
                if let Some(offset) = flash::first_mismatch(&source, &readback) {
                    println!(
                        "Mismatch at 0x{:06X}: expected 0x{:02X}, found 0x{:02X}",
                        offset, source[offset], readback[offset]
                    );
                }
                Err(Error::VerificationMismatch.into())
            }
        }
    })
}
