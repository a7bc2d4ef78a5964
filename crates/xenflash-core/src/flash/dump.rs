//! Dump (read) engine

use crate::bank::BankSelector;
use crate::error::{Error, Result};
use crate::flash::{check_image_len, SessionProgress};
use crate::programmer::XeniumDevice;
use crate::region::{FlashRegion, REGIONS};

/// Bytes per bus read
pub const CHUNK_SIZE: usize = 128;

const fn chunk_divides_regions() -> bool {
    let mut i = 0;
    while i < REGIONS.len() {
        if REGIONS[i].size as usize % CHUNK_SIZE != 0 {
            return false;
        }
        i += 1;
    }
    true
}

// No chunk may straddle a region boundary.
const _: () = assert!(chunk_divides_regions());

/// Read the whole flash into `dest`
///
/// Walks the address space in ascending order, selecting each region's bank
/// once when the walk enters it. `dest` must be exactly one flash image.
pub fn dump<D, P>(
    selector: &mut BankSelector<'_, D>,
    dest: &mut [u8],
    progress: &mut P,
) -> Result<()>
where
    D: XeniumDevice + ?Sized,
    P: SessionProgress + ?Sized,
{
    check_image_len(dest.len())?;

    let mut done = 0;
    for region in &REGIONS {
        read_region(selector, region, &mut dest[region.range()], &mut done, progress)?;
    }
    Ok(())
}

/// Read a single region into `dest`
///
/// `dest` must be exactly the region's size.
pub fn dump_region<D, P>(
    selector: &mut BankSelector<'_, D>,
    region: &FlashRegion,
    dest: &mut [u8],
    progress: &mut P,
) -> Result<()>
where
    D: XeniumDevice + ?Sized,
    P: SessionProgress + ?Sized,
{
    if dest.len() != region.size as usize {
        return Err(Error::ImageSize {
            expected: region.size as usize,
            actual: dest.len(),
        });
    }
    let mut done = 0;
    read_region(selector, region, dest, &mut done, progress)
}

fn read_region<D, P>(
    selector: &mut BankSelector<'_, D>,
    region: &FlashRegion,
    dest: &mut [u8],
    done: &mut usize,
    progress: &mut P,
) -> Result<()>
where
    D: XeniumDevice + ?Sized,
    P: SessionProgress + ?Sized,
{
    log::info!("  {}...", region.name);
    selector.select(region)?;
    progress.region(region);

    let mut bank_addr = 0u32;
    for chunk in dest.chunks_mut(CHUNK_SIZE) {
        selector.read(region, bank_addr, chunk)?;
        bank_addr += chunk.len() as u32;
        *done += chunk.len();
        progress.progress(*done);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::NoProgress;
    use crate::region::{Bank, FLASH_SIZE, RECOVERY};
    use crate::testing::{Event, FakeDevice};

    fn patterned() -> FakeDevice {
        let mut dev = FakeDevice::new();
        for (i, byte) in dev.data.iter_mut().enumerate() {
            *byte = (i ^ (i >> 8) ^ (i >> 16)) as u8;
        }
        dev
    }

    #[test]
    fn test_dump_reads_every_address_once_in_order() {
        let mut dev = patterned();
        let mut image = vec![0u8; FLASH_SIZE];
        {
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            dump(&mut selector, &mut image, &mut NoProgress).unwrap();
        }
        assert_eq!(image, dev.data);

        // Rebuild the flat address of every read from the recorded bank.
        let mut next_flat = 0u32;
        for event in &dev.events {
            if let Event::Read { bank, addr, len } = *event {
                let region = REGIONS
                    .iter()
                    .find(|r| r.bank.raw() == bank)
                    .unwrap();
                assert_eq!(len, CHUNK_SIZE);
                assert_eq!(region.start + addr, next_flat);
                next_flat += len as u32;
            }
        }
        assert_eq!(next_flat as usize, FLASH_SIZE);
    }

    #[test]
    fn test_dump_selects_each_bank_once() {
        let mut dev = patterned();
        let mut image = vec![0u8; FLASH_SIZE];
        {
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            dump(&mut selector, &mut image, &mut NoProgress).unwrap();
        }
        assert_eq!(
            dev.selections(),
            vec![
                Bank::Bios1M.raw(),
                Bank::XeniumOs.raw(),
                Bank::Cromwell.raw(),
                Bank::Recovery.raw()
            ]
        );

        // Each selection happens right before the first read of its region.
        let first_reads: Vec<_> = dev
            .events
            .windows(2)
            .filter_map(|w| match (w[0], w[1]) {
                (Event::SelectBank(_), Event::Read { addr, .. }) => Some(addr),
                _ => None,
            })
            .collect();
        assert_eq!(first_reads, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_dump_rejects_wrong_size() {
        let mut dev = FakeDevice::new();
        let mut selector = BankSelector::attach(&mut dev).unwrap();
        let mut image = vec![0u8; FLASH_SIZE - 1];
        assert_eq!(
            dump(&mut selector, &mut image, &mut NoProgress),
            Err(Error::ImageSize {
                expected: FLASH_SIZE,
                actual: FLASH_SIZE - 1
            })
        );
    }

    #[test]
    fn test_dump_region() {
        let mut dev = patterned();
        let expected = dev.data[RECOVERY.range()].to_vec();
        let mut buf = vec![0u8; RECOVERY.size as usize];
        {
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            dump_region(&mut selector, RECOVERY, &mut buf, &mut NoProgress).unwrap();
        }
        assert_eq!(buf, expected);
        assert_eq!(dev.selections(), vec![Bank::Recovery.raw()]);
    }

    #[test]
    fn test_dump_reports_progress() {
        #[derive(Default)]
        struct Recorder {
            regions: Vec<&'static str>,
            last: usize,
            calls: usize,
        }

        impl SessionProgress for Recorder {
            fn region(&mut self, region: &FlashRegion) {
                self.regions.push(region.name);
            }

            fn progress(&mut self, bytes_done: usize) {
                assert!(bytes_done > self.last);
                self.last = bytes_done;
                self.calls += 1;
            }
        }

        let mut dev = FakeDevice::new();
        let mut image = vec![0u8; FLASH_SIZE];
        let mut recorder = Recorder::default();
        let mut selector = BankSelector::attach(&mut dev).unwrap();
        dump(&mut selector, &mut image, &mut recorder).unwrap();

        assert_eq!(
            recorder.regions,
            vec!["BIOS Banks", "XeniumOS", "Boot Loader", "Recovery"]
        );
        assert_eq!(recorder.last, FLASH_SIZE);
        assert_eq!(recorder.calls, FLASH_SIZE / CHUNK_SIZE);
    }
}
