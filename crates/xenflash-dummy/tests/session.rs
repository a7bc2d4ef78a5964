//! End-to-end sessions against the emulated device

use xenflash_core::bank::BankSelector;
use xenflash_core::chip::Am29lv160;
use xenflash_core::flash::{self, NoProgress, Verification};
use xenflash_core::image::FlashImage;
use xenflash_core::probe;
use xenflash_core::region::{Bank, FLASH_SIZE, REGIONS};
use xenflash_core::Error;
use xenflash_dummy::{DummyConfig, DummyXenium};

fn genuine_with(initial: &[u8]) -> Am29lv160<DummyXenium> {
    Am29lv160::new(DummyXenium::with_data(DummyConfig::default(), initial))
}

#[test]
fn protected_sector_difference_still_verifies() {
    // Device already holds other data in the protected sector
    let mut initial = vec![0x00u8; FLASH_SIZE];
    initial[0x1C_0000..0x1E_0000].fill(0x12);
    let mut device = genuine_with(&initial);

    let mut source = FlashImage::blank();
    source.fill(0xAA);
    source[0x1C_0000..0x1E_0000].fill(0x55);
    let mut readback = FlashImage::blank();

    let outcome = {
        let mut selector = BankSelector::attach(&mut device).unwrap();
        let outcome =
            flash::run_session(&mut selector, &mut source, &mut readback, &mut NoProgress)
                .unwrap();
        selector.restore_boot_bank().unwrap();
        outcome
    };

    assert_eq!(outcome, Verification::Verified);
    let data = device.bus().data();
    assert!(data[..0x1C_0000].iter().all(|&b| b == 0xAA));
    assert!(data[0x1C_0000..0x1E_0000].iter().all(|&b| b == 0x12));
    assert!(data[0x1E_0000..].iter().all(|&b| b == 0xAA));
    assert_eq!(device.bus().bank_register(), Bank::Cromwell.raw());
}

#[test]
fn last_byte_difference_is_a_mismatch() {
    let mut device = genuine_with(&[]);
    let mut readback = FlashImage::blank();
    {
        let mut source = FlashImage::blank();
        source.fill(0x3C);
        let mut selector = BankSelector::attach(&mut device).unwrap();
        flash::run_session(&mut selector, &mut source, &mut readback, &mut NoProgress)
            .unwrap()
            .into_result()
            .unwrap();
    }

    // The chip holds the programmed image; a source differing only in its
    // final byte must not verify against a fresh dump.
    let mut source = FlashImage::blank();
    source.fill(0x3C);
    source[0x1F_FFFF] = 0x3D;
    {
        let mut selector = BankSelector::attach(&mut device).unwrap();
        flash::dump(&mut selector, &mut readback, &mut NoProgress).unwrap();
    }
    assert_eq!(flash::first_mismatch(&source, &readback), Some(0x1F_FFFF));
    assert_eq!(
        flash::verify(&mut source, &mut readback).unwrap(),
        Verification::Mismatch
    );
}

#[test]
fn round_trip_on_unprotected_device() {
    let config = DummyConfig {
        genuine: false,
        ..Default::default()
    };
    let mut device = Am29lv160::new(DummyXenium::new(config));

    let bytes: Vec<u8> = (0..FLASH_SIZE).map(|i| (i ^ (i >> 8)) as u8).collect();
    let image = FlashImage::from_bytes(bytes).unwrap();
    let mut source = image.clone();
    let mut readback = FlashImage::blank();
    {
        let mut selector = BankSelector::attach(&mut device).unwrap();
        let outcome =
            flash::run_session(&mut selector, &mut source, &mut readback, &mut NoProgress)
                .unwrap();
        assert!(outcome.is_verified());
    }

    // Nothing is masked on the device itself
    assert_eq!(device.bus().data(), &image[..]);

    let mut dumped = FlashImage::blank();
    let mut selector = BankSelector::attach(&mut device).unwrap();
    flash::dump(&mut selector, &mut dumped, &mut NoProgress).unwrap();
    assert_eq!(dumped, image);
}

#[test]
fn session_selects_each_region_once_per_pass() {
    let mut device = genuine_with(&[]);
    let mut source = FlashImage::blank();
    let mut readback = FlashImage::blank();
    {
        let mut selector = BankSelector::attach(&mut device).unwrap();
        flash::run_session(&mut selector, &mut source, &mut readback, &mut NoProgress).unwrap();
    }

    let region_banks: Vec<u8> = REGIONS.iter().map(|r| r.bank.raw()).collect();
    let writes = device.bus().bank_writes();
    // Handshake, then program pass, then verify pass
    assert_eq!(writes.len(), 3 + 2 * REGIONS.len());
    assert_eq!(&writes[3..7], &region_banks[..]);
    assert_eq!(&writes[7..], &region_banks[..]);
    assert_eq!(device.bus().erase_count(), 1);
}

#[test]
fn wrong_identity_leaves_flash_untouched() {
    let config = DummyConfig {
        device_id: 0x49,
        ..Default::default()
    };
    let initial = vec![0x5Au8; FLASH_SIZE];
    let mut device = Am29lv160::new(DummyXenium::with_data(config, &initial));

    let mut source = FlashImage::blank();
    let mut readback = FlashImage::blank();
    let err = {
        let mut selector = BankSelector::attach(&mut device).unwrap();
        flash::run_session(&mut selector, &mut source, &mut readback, &mut NoProgress)
            .unwrap_err()
    };

    assert_eq!(
        err,
        Error::DeviceNotPresent {
            manufacturer: 0x01,
            device: 0x49
        }
    );
    assert_eq!(device.bus().erase_count(), 0);
    assert_eq!(device.bus().data(), &initial[..]);
}

#[test]
fn probe_is_repeatable() {
    let mut device = genuine_with(&[]);
    let mut selector = BankSelector::attach(&mut device).unwrap();
    for _ in 0..3 {
        assert!(probe::probe_device_present(&mut selector).unwrap());
    }
    assert_eq!(selector.selected(), Some(Bank::Cromwell));
}

#[test]
fn dump_single_region() {
    let mut initial = vec![0u8; FLASH_SIZE];
    initial[0x10_0000..0x18_0000].fill(0x77);
    let mut device = genuine_with(&initial);

    let xos = xenflash_core::region::region_by_name("xeniumos").unwrap();
    let mut buf = vec![0u8; xos.size as usize];
    let mut selector = BankSelector::attach(&mut device).unwrap();
    flash::dump_region(&mut selector, xos, &mut buf, &mut NoProgress).unwrap();
    assert!(buf.iter().all(|&b| b == 0x77));
}
