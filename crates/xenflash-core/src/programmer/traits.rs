//! Programmer trait definitions
//!
//! All calls are blocking: each one returns when the hardware access it
//! describes has completed.

use crate::error::Result;

/// I/O port of the bank register
pub const BANK_REGISTER_PORT: u16 = 0xEF;

/// I/O port of the LED register
pub const LED_REGISTER_PORT: u16 = 0xEE;

/// Raw access to the LPC bus the device sits on
///
/// Memory addresses are relative to the start of the flash window, so they
/// always refer to whatever bank is currently selected.
///
/// Nothing outside [`BankSelector`](crate::bank::BankSelector) should call
/// [`write_bank_register`](LpcBus::write_bank_register) directly.
pub trait LpcBus {
    /// Write the bank register
    fn write_bank_register(&mut self, value: u8) -> Result<()>;

    /// Read the bank register
    ///
    /// Only the low nibble carries the bank number.
    fn read_bank_register(&mut self) -> Result<u8>;

    /// Write the LED register
    fn write_led_register(&mut self, value: u8) -> Result<()>;

    /// Burst read from the flash window
    ///
    /// There is no way to detect a bad read at this level: the bus returns
    /// whatever the hardware drives.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()>;

    /// Single memory read cycle
    fn read_byte(&mut self, addr: u32) -> Result<u8> {
        let mut byte = [0u8];
        self.read(addr, &mut byte)?;
        Ok(byte[0])
    }

    /// Single memory write cycle
    fn write_byte(&mut self, addr: u32, value: u8) -> Result<()>;
}

/// Byte-level flash chip operations
///
/// Implementations block until the chip reports the operation as complete.
pub trait FlashChip {
    /// Erase the whole chip
    ///
    /// This cannot be interrupted. Losing power during the erase leaves the
    /// chip in an undefined state.
    fn erase_chip(&mut self) -> Result<()>;

    /// Program a single byte at a window-relative address
    fn program_byte(&mut self, addr: u32, value: u8) -> Result<()>;

    /// Read the manufacturer code
    fn manufacturer_id(&mut self) -> Result<u8>;

    /// Read the device code
    fn device_id(&mut self) -> Result<u8>;
}

/// A complete device: bus access plus chip driver
///
/// Implemented automatically for everything that provides both halves.
pub trait XeniumDevice: LpcBus + FlashChip {}

impl<T: LpcBus + FlashChip + ?Sized> XeniumDevice for T {}

/// Information about a programmer
#[derive(Debug, Clone)]
pub struct ProgrammerInfo {
    /// Name of the programmer
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Description
    pub description: &'static str,
    /// Whether this programmer requires elevated privileges
    pub requires_root: bool,
}
