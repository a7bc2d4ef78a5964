//! Bank selection
//!
//! The bank register is shared hardware state: whatever was written last
//! decides which region answers in the LPC window. [`BankSelector`] holds
//! the exclusive borrow of the device for as long as an operation runs, is
//! the only writer of the register, and refuses any window access that names
//! a bank other than the one it selected.

use crate::error::{Error, Result};
use crate::led::Led;
use crate::programmer::XeniumDevice;
use crate::region::{Bank, FlashRegion};

/// Mask for the bank number in the bank register
const BANK_MASK: u8 = 0x0F;

/// Bank to fall back to when the boot bank cannot be determined
pub const DEFAULT_BOOT_BANK: Bank = Bank::Cromwell;

/// Exclusive handle on a device that tracks the selected bank
pub struct BankSelector<'d, D: XeniumDevice + ?Sized> {
    device: &'d mut D,
    selected: u8,
    boot_bank: Bank,
}

impl<'d, D: XeniumDevice + ?Sized> BankSelector<'d, D> {
    /// Take control of a device
    ///
    /// Reads the bank register once to learn which bank the console booted
    /// from. A value outside the known BIOS banks usually means the console
    /// was started from something other than the device; in that case the
    /// boot loader bank is remembered instead.
    pub fn attach(device: &'d mut D) -> Result<Self> {
        let selected = device.read_bank_register()? & BANK_MASK;
        let boot_bank = match Bank::from_raw(selected) {
            Some(Bank::Tsop) | None => {
                log::warn!(
                    "Bank register reads {}, assuming {} as boot bank",
                    selected,
                    DEFAULT_BOOT_BANK.name()
                );
                DEFAULT_BOOT_BANK
            }
            Some(bank) => bank,
        };
        log::debug!("Attached to device, boot bank {}", boot_bank.name());

        Ok(Self {
            device,
            selected,
            boot_bank,
        })
    }

    /// Bank the console booted from
    pub fn boot_bank(&self) -> Bank {
        self.boot_bank
    }

    /// Currently selected bank, if the register holds a known value
    pub fn selected(&self) -> Option<Bank> {
        Bank::from_raw(self.selected)
    }

    /// Select the bank that maps `region`
    pub fn select(&mut self, region: &FlashRegion) -> Result<()> {
        self.select_bank(region.bank)
    }

    /// Write a bank number to the bank register
    pub fn select_bank(&mut self, bank: Bank) -> Result<()> {
        log::debug!("Selecting bank {} ({})", bank.raw(), bank.name());
        self.device.write_bank_register(bank.raw())?;
        self.selected = bank.raw();
        Ok(())
    }

    /// Switch back to the bank the console booted from
    pub fn restore_boot_bank(&mut self) -> Result<()> {
        self.select_bank(self.boot_bank)
    }

    fn ensure_selected(&self, bank: Bank) -> Result<()> {
        if self.selected != bank.raw() {
            return Err(Error::BankNotSelected {
                expected: bank,
                selected: self.selected,
            });
        }
        Ok(())
    }

    fn check_range(region: &FlashRegion, addr: u32, len: usize) -> Result<()> {
        let end = addr as u64 + len as u64;
        if end > region.size as u64 {
            return Err(Error::AddressOutOfBounds);
        }
        Ok(())
    }

    /// Read from `region` at a bank-relative address
    ///
    /// The region's bank must be the selected one.
    pub fn read(&mut self, region: &FlashRegion, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.ensure_selected(region.bank)?;
        Self::check_range(region, addr, buf.len())?;
        self.device.read(addr, buf)
    }

    /// Program one byte of `region` at a bank-relative address
    ///
    /// The region's bank must be the selected one.
    pub fn program_byte(&mut self, region: &FlashRegion, addr: u32, value: u8) -> Result<()> {
        self.ensure_selected(region.bank)?;
        Self::check_range(region, addr, 1)?;
        self.device.program_byte(addr, value)
    }

    /// Read from whatever bank is live and throw the data away
    ///
    /// Only useful to clock the device's control logic during the wake-up
    /// handshake; the data never leaves this function.
    pub(crate) fn discard_read(&mut self, addr: u32, len: usize) -> Result<()> {
        let mut scratch = [0u8; 16];
        let mut done = 0;
        while done < len {
            let chunk = core::cmp::min(scratch.len(), len - done);
            self.device
                .read(addr + done as u32, &mut scratch[..chunk])?;
            done += chunk;
        }
        Ok(())
    }

    /// Erase the whole chip
    ///
    /// Chip erase is not tied to a bank.
    pub fn erase_chip(&mut self) -> Result<()> {
        self.device.erase_chip()
    }

    /// Read manufacturer and device codes in the selected bank
    pub fn read_ids(&mut self) -> Result<(u8, u8)> {
        let manufacturer = self.device.manufacturer_id()?;
        let device = self.device.device_id()?;
        Ok((manufacturer, device))
    }

    /// Set the device's status LED
    pub fn set_led(&mut self, led: Led) -> Result<()> {
        log::debug!("Setting LED to {}", led.name());
        self.device.write_led_register(led.raw())
    }
}
