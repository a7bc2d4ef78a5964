//! Full programming session

use crate::bank::BankSelector;
use crate::error::Result;
use crate::flash::{
    check_image_len, dump, erase_chip, program, verify, SessionProgress, Verification,
};
use crate::probe;
use crate::programmer::XeniumDevice;
use crate::region::FLASH_SIZE;

/// Probe, erase, program and verify a full image
///
/// `source` is the image to write and `readback` a scratch buffer of the
/// same size for the verification read. Both must hold exactly one flash
/// image; they are checked before anything touches the chip. On return the
/// write-protected sector of both buffers has been zero-filled.
///
/// Returns [`Error::DeviceNotPresent`](crate::Error::DeviceNotPresent) without
/// erasing anything when the probe fails. A failed verification is reported
/// as [`Verification::Mismatch`], not as an error: the session itself ran to
/// completion, but the device content should be treated as inconsistent and
/// the whole session repeated.
///
/// Nothing here can detect the device being removed or power being lost
/// after the probe. Either leaves the flash in an undefined state.
pub fn run_session<D, P>(
    selector: &mut BankSelector<'_, D>,
    source: &mut [u8],
    readback: &mut [u8],
    progress: &mut P,
) -> Result<Verification>
where
    D: XeniumDevice + ?Sized,
    P: SessionProgress + ?Sized,
{
    check_image_len(source.len())?;
    check_image_len(readback.len())?;

    let identity = probe::require_device(selector)?;
    log::info!("Device detected ({})", identity);

    erase_chip(selector, progress)?;

    log::info!("Writing:");
    progress.writing(FLASH_SIZE);
    program(selector, source, progress)?;

    log::info!("Verifying:");
    progress.verifying(FLASH_SIZE);
    dump(selector, readback, progress)?;

    let outcome = verify(source, readback)?;
    match outcome {
        Verification::Verified => log::info!("Flash verified"),
        Verification::Mismatch => log::error!("Error verifying flash"),
    }
    progress.complete(outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::flash::NoProgress;
    use crate::testing::{Event, FakeDevice};

    #[test]
    fn test_round_trip() {
        let mut source: Vec<u8> = (0..FLASH_SIZE).map(|i| (i * 13 + 7) as u8).collect();
        let original = source.clone();
        let mut readback = vec![0u8; FLASH_SIZE];
        let mut dev = FakeDevice::new();
        dev.data.fill(0x00);

        {
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            let outcome =
                run_session(&mut selector, &mut source, &mut readback, &mut NoProgress).unwrap();
            assert_eq!(outcome, Verification::Verified);
        }
        assert_eq!(dev.data, original);
    }

    #[test]
    fn test_no_device_means_no_erase() {
        let mut source = vec![0u8; FLASH_SIZE];
        let mut readback = vec![0u8; FLASH_SIZE];
        let mut dev = FakeDevice::with_ids(0xFF, 0xFF);
        dev.data.fill(0x12);

        {
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            let err = run_session(&mut selector, &mut source, &mut readback, &mut NoProgress)
                .unwrap_err();
            assert!(matches!(err, Error::DeviceNotPresent { .. }));
        }
        assert!(!dev.events.contains(&Event::EraseChip));
        assert_eq!(dev.programmed, 0);
        assert!(dev.data.iter().all(|&b| b == 0x12));
    }

    #[test]
    fn test_bad_buffer_checked_before_probe() {
        let mut source = vec![0u8; 100];
        let mut readback = vec![0u8; FLASH_SIZE];
        let mut dev = FakeDevice::new();
        {
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            assert!(matches!(
                run_session(&mut selector, &mut source, &mut readback, &mut NoProgress),
                Err(Error::ImageSize { actual: 100, .. })
            ));
        }
        assert!(dev.events.is_empty());
    }

    #[test]
    fn test_phase_order() {
        #[derive(Default)]
        struct Phases(Vec<&'static str>);

        impl SessionProgress for Phases {
            fn erasing(&mut self) {
                self.0.push("erasing");
            }
            fn writing(&mut self, _total_bytes: usize) {
                self.0.push("writing");
            }
            fn verifying(&mut self, _total_bytes: usize) {
                self.0.push("verifying");
            }
            fn complete(&mut self, _outcome: Verification) {
                self.0.push("complete");
            }
        }

        let mut source = vec![0x00u8; FLASH_SIZE];
        let mut readback = vec![0u8; FLASH_SIZE];
        let mut dev = FakeDevice::new();
        let mut phases = Phases::default();
        let mut selector = BankSelector::attach(&mut dev).unwrap();
        let outcome = run_session(&mut selector, &mut source, &mut readback, &mut phases).unwrap();

        assert!(outcome.is_verified());
        assert_eq!(phases.0, vec!["erasing", "writing", "verifying", "complete"]);
    }

    #[test]
    fn test_corrupt_readback_is_a_mismatch() {
        let mut source = vec![0xAAu8; FLASH_SIZE];
        let mut readback = vec![0u8; FLASH_SIZE];
        let mut dev = FakeDevice::new();
        dev.corrupt_read_at = Some(0x1F_FFFF);

        let mut selector = BankSelector::attach(&mut dev).unwrap();
        let outcome =
            run_session(&mut selector, &mut source, &mut readback, &mut NoProgress).unwrap();
        assert_eq!(outcome, Verification::Mismatch);
    }
}
