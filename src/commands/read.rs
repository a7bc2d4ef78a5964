//! Read (dump) command

use std::path::Path;
use xenflash_core::flash::{self, SessionProgress};
use xenflash_core::image::FlashImage;
use xenflash_core::probe;
use xenflash_core::region::{self, FLASH_SIZE};

use super::{with_device, CommandResult, IndicatifProgress};

/// Dump the whole flash, or a single region, to `output`
pub fn run(programmer: &str, output: &Path, region: Option<&str>) -> CommandResult {
    let region = match region {
        Some(name) => Some(
            region::region_by_name(name)
                .ok_or_else(|| format!("Unknown region '{}' (see `xenflash layout`)", name))?,
        ),
        None => None,
    };

    with_device(programmer, |selector| {
        let identity = probe::require_device(selector)?;
        log::info!("Device detected ({})", identity);

        let mut progress = IndicatifProgress::new();
        match region {
            Some(region) => {
                log::info!("Reading {}...", region.name);
                let mut image = FlashImage::blank();
                progress.reading(region.size as usize);
                flash::dump_region(selector, region, image.region_mut(region), &mut progress)?;
                progress.finish("Read complete");
                let data = image.region(region);
                std::fs::write(output, data)?;
                println!("Wrote {} bytes to {}", data.len(), output.display());
            }
            None => {
                log::info!("Reading full flash...");
                let mut image = FlashImage::blank();
                progress.reading(FLASH_SIZE);
                flash::dump(selector, &mut image, &mut progress)?;
                progress.finish("Read complete");
                image.write_to_file(output)?;
                println!("Wrote {} bytes to {}", image.len(), output.display());
            }
        }
        Ok(())
    })
}
