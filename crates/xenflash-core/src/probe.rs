//! Device presence probe
//!
//! A genuine device's CPLD does not answer identity queries straight after
//! power-up. It has to be walked through something resembling the normal
//! boot sequence first: a few window reads interleaved with selections of the
//! XeniumOS and recovery banks, ending on the boot loader bank. Only then do
//! the chip's autoselect codes come back correctly.

use core::fmt;

use crate::bank::BankSelector;
use crate::error::{Error, Result};
use crate::programmer::XeniumDevice;
use crate::region::Bank;

/// Manufacturer code of the flash chip on a genuine device
pub const EXPECTED_MANUFACTURER: u8 = 0x01;

/// Device code of the flash chip on a genuine device
pub const EXPECTED_DEVICE: u8 = 0xC4;

/// Window address read during the handshake
pub const WAKE_READ_ADDR: u32 = 0x70;

/// Number of bytes read at each handshake read step
pub const WAKE_READ_LEN: usize = 8;

/// One step of the wake-up handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    /// Read [`WAKE_READ_LEN`] bytes at [`WAKE_READ_ADDR`] and discard them
    Read,
    /// Write a bank number to the bank register
    Select(Bank),
}

/// The wake-up handshake, in order
pub const HANDSHAKE: [HandshakeStep; 6] = [
    HandshakeStep::Read,
    HandshakeStep::Select(Bank::XeniumOs),
    HandshakeStep::Read,
    HandshakeStep::Select(Bank::Recovery),
    HandshakeStep::Read,
    HandshakeStep::Select(Bank::Cromwell),
];

/// Identity codes read from the flash chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Manufacturer code
    pub manufacturer: u8,
    /// Device code
    pub device: u8,
}

impl DeviceIdentity {
    /// Identity of a genuine device
    pub const EXPECTED: Self = Self {
        manufacturer: EXPECTED_MANUFACTURER,
        device: EXPECTED_DEVICE,
    };

    /// Check whether both codes match a genuine device
    pub fn is_expected(&self) -> bool {
        *self == Self::EXPECTED
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}:{:02X}", self.manufacturer, self.device)
    }
}

/// Run the wake-up handshake
///
/// Leaves the boot loader bank selected.
pub fn wake<D: XeniumDevice + ?Sized>(selector: &mut BankSelector<'_, D>) -> Result<()> {
    for step in HANDSHAKE {
        match step {
            HandshakeStep::Read => selector.discard_read(WAKE_READ_ADDR, WAKE_READ_LEN)?,
            HandshakeStep::Select(bank) => selector.select_bank(bank)?,
        }
    }
    Ok(())
}

/// Wake the device and read its identity codes
///
/// Safe to repeat: apart from leaving the boot loader bank selected it has no
/// side effects.
pub fn read_identity<D: XeniumDevice + ?Sized>(
    selector: &mut BankSelector<'_, D>,
) -> Result<DeviceIdentity> {
    wake(selector)?;
    let (manufacturer, device) = selector.read_ids()?;
    let identity = DeviceIdentity {
        manufacturer,
        device,
    };
    log::debug!("Device identity {}", identity);
    Ok(identity)
}

/// Check whether the expected device is present
pub fn probe_device_present<D: XeniumDevice + ?Sized>(
    selector: &mut BankSelector<'_, D>,
) -> Result<bool> {
    Ok(read_identity(selector)?.is_expected())
}

/// Probe and fail with [`Error::DeviceNotPresent`] unless the device answers
pub fn require_device<D: XeniumDevice + ?Sized>(
    selector: &mut BankSelector<'_, D>,
) -> Result<DeviceIdentity> {
    let identity = read_identity(selector)?;
    if !identity.is_expected() {
        log::warn!(
            "Unexpected identity {} (expected {})",
            identity,
            DeviceIdentity::EXPECTED
        );
        return Err(Error::DeviceNotPresent {
            manufacturer: identity.manufacturer,
            device: identity.device,
        });
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, FakeDevice};

    fn wake_read(bank: Bank) -> Event {
        Event::Read {
            bank: bank.raw(),
            addr: WAKE_READ_ADDR,
            len: WAKE_READ_LEN,
        }
    }

    #[test]
    fn test_handshake_sequence() {
        let mut dev = FakeDevice::new();
        dev.bank_register = Bank::Bios1M.raw();
        {
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            assert!(probe_device_present(&mut selector).unwrap());
            assert_eq!(selector.selected(), Some(Bank::Cromwell));
        }

        assert_eq!(
            dev.events,
            vec![
                wake_read(Bank::Bios1M),
                Event::SelectBank(Bank::XeniumOs.raw()),
                wake_read(Bank::XeniumOs),
                Event::SelectBank(Bank::Recovery.raw()),
                wake_read(Bank::Recovery),
                Event::SelectBank(Bank::Cromwell.raw()),
                Event::ManufacturerId,
                Event::DeviceId,
            ]
        );
    }

    #[test]
    fn test_probe_is_repeatable() {
        let mut dev = FakeDevice::new();
        let before = dev.data.clone();
        {
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            assert!(probe_device_present(&mut selector).unwrap());
            assert!(probe_device_present(&mut selector).unwrap());
        }
        assert_eq!(dev.events.len(), 16);
        assert_eq!(dev.events[..8], dev.events[8..]);
        assert_eq!(dev.data, before);
    }

    #[test]
    fn test_probe_determinism() {
        let cases = [
            (0x01, 0xC4, true),
            (0x01, 0xC5, false),
            (0x02, 0xC4, false),
            (0xC4, 0x01, false),
            (0x00, 0x00, false),
            (0xFF, 0xFF, false),
            (0x01, 0xFF, false),
        ];

        for (manufacturer, device, expected) in cases {
            let mut dev = FakeDevice::with_ids(manufacturer, device);
            let mut selector = BankSelector::attach(&mut dev).unwrap();
            assert_eq!(
                probe_device_present(&mut selector).unwrap(),
                expected,
                "ids {:02X}:{:02X}",
                manufacturer,
                device
            );
        }
    }

    #[test]
    fn test_require_device_reports_ids() {
        let mut dev = FakeDevice::with_ids(0xFF, 0xFF);
        let mut selector = BankSelector::attach(&mut dev).unwrap();
        assert_eq!(
            require_device(&mut selector),
            Err(Error::DeviceNotPresent {
                manufacturer: 0xFF,
                device: 0xFF
            })
        );
    }
}
