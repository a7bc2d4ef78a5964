//! Write command: erase, program and verify a full image

use std::path::Path;
use xenflash_core::flash::{self, Verification};
use xenflash_core::image::FlashImage;
use xenflash_core::led::Led;
use xenflash_core::Error;

use super::{with_device, CommandResult, IndicatifProgress};

/// Program the image at `input`
///
/// The image is loaded completely before the device is opened, so a missing
/// or short file never leads to an erase.
pub fn run(programmer: &str, input: &Path, led: Option<Led>) -> CommandResult {
    let mut source = FlashImage::from_file(input).map_err(|e| {
        log::error!("{}", e);
        Error::SourceUnavailable
    })?;
    let mut readback = FlashImage::blank();

    with_device(programmer, |selector| {
        let mut progress = IndicatifProgress::new();
        let outcome = flash::run_session(selector, &mut source, &mut readback, &mut progress)?;

        match outcome {
            Verification::Verified => {
                println!("Flash verified");
                if let Some(led) = led {
                    selector.set_led(led)?;
                }
                Ok(())
            }
            Verification::Mismatch => {
                if let Some(offset) = flash::first_mismatch(&source, &readback) {
                    log::error!("First mismatch at 0x{:06X}", offset);
                }
                println!("Flash contents are inconsistent; run the write again");
                Err(Error::VerificationMismatch.into())
            }
        }
    })
}
