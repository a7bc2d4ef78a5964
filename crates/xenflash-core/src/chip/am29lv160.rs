//! AMD AM29LV160 (byte mode) command set
//!
//! The chip is driven through plain memory cycles on the flash window:
//! every command starts with the two-cycle unlock sequence, and embedded
//! program/erase operations are tracked with the DQ6 toggle bit.

use crate::error::{Error, Result};
use crate::programmer::{FlashChip, LpcBus};

/// First unlock address (byte mode)
const UNLOCK_ADDR1: u32 = 0xAAA;
/// Second unlock address (byte mode)
const UNLOCK_ADDR2: u32 = 0x555;

const UNLOCK_DATA1: u8 = 0xAA;
const UNLOCK_DATA2: u8 = 0x55;

const CMD_PROGRAM: u8 = 0xA0;
const CMD_ERASE_SETUP: u8 = 0x80;
const CMD_CHIP_ERASE: u8 = 0x10;
const CMD_AUTOSELECT: u8 = 0x90;
const CMD_RESET: u8 = 0xF0;

/// Autoselect address of the manufacturer code
const AUTOSELECT_MANUFACTURER: u32 = 0x00;
/// Autoselect address of the device code (byte mode)
const AUTOSELECT_DEVICE: u32 = 0x02;

/// Toggle bit
const DQ6: u8 = 1 << 6;
/// Exceeded timing limits
const DQ5: u8 = 1 << 5;

/// Toggle polls allowed for a single byte program
pub const PROGRAM_MAX_POLLS: u32 = 100_000;

/// Toggle polls allowed for a full-chip erase
pub const ERASE_MAX_POLLS: u32 = 50_000_000;

/// AM29LV160 driver on top of a raw bus
#[derive(Debug)]
pub struct Am29lv160<B> {
    bus: B,
    program_polls: u32,
    erase_polls: u32,
}

impl<B: LpcBus> Am29lv160<B> {
    /// Wrap a bus
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            program_polls: PROGRAM_MAX_POLLS,
            erase_polls: ERASE_MAX_POLLS,
        }
    }

    /// Override the poll limits
    pub fn with_poll_limits(mut self, program_polls: u32, erase_polls: u32) -> Self {
        self.program_polls = program_polls;
        self.erase_polls = erase_polls;
        self
    }

    /// Get a reference to the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Unwrap the underlying bus
    pub fn into_inner(self) -> B {
        self.bus
    }

    fn command(&mut self, cmd: u8) -> Result<()> {
        self.bus.write_byte(UNLOCK_ADDR1, UNLOCK_DATA1)?;
        self.bus.write_byte(UNLOCK_ADDR2, UNLOCK_DATA2)?;
        self.bus.write_byte(UNLOCK_ADDR1, cmd)
    }

    fn reset(&mut self) -> Result<()> {
        self.bus.write_byte(0, CMD_RESET)
    }

    fn autoselect(&mut self, addr: u32) -> Result<u8> {
        self.command(CMD_AUTOSELECT)?;
        let value = self.bus.read_byte(addr)?;
        self.reset()?;
        Ok(value)
    }

    /// Wait for an embedded operation to finish
    ///
    /// DQ6 toggles on every read while the operation runs. If DQ5 goes high
    /// the chip gave up; one more toggle check tells a late finish apart from
    /// a real failure.
    fn wait_ready(&mut self, addr: u32, max_polls: u32) -> Result<()> {
        for _ in 0..max_polls {
            let first = self.bus.read_byte(addr)?;
            let second = self.bus.read_byte(addr)?;
            if (first ^ second) & DQ6 == 0 {
                return Ok(());
            }
            if second & DQ5 != 0 {
                let first = self.bus.read_byte(addr)?;
                let second = self.bus.read_byte(addr)?;
                if (first ^ second) & DQ6 == 0 {
                    return Ok(());
                }
                log::error!("Flash reported a failed operation at 0x{:06X}", addr);
                self.reset()?;
                return Err(Error::Timeout);
            }
        }
        log::error!("Flash busy after {} polls at 0x{:06X}", max_polls, addr);
        self.reset()?;
        Err(Error::Timeout)
    }
}

impl<B: LpcBus> FlashChip for Am29lv160<B> {
    fn erase_chip(&mut self) -> Result<()> {
        self.command(CMD_ERASE_SETUP)?;
        self.command(CMD_CHIP_ERASE)?;
        self.wait_ready(0, self.erase_polls)
    }

    fn program_byte(&mut self, addr: u32, value: u8) -> Result<()> {
        self.command(CMD_PROGRAM)?;
        self.bus.write_byte(addr, value)?;
        self.wait_ready(addr, self.program_polls)
    }

    fn manufacturer_id(&mut self) -> Result<u8> {
        self.autoselect(AUTOSELECT_MANUFACTURER)
    }

    fn device_id(&mut self) -> Result<u8> {
        self.autoselect(AUTOSELECT_DEVICE)
    }
}

impl<B: LpcBus> LpcBus for Am29lv160<B> {
    fn write_bank_register(&mut self, value: u8) -> Result<()> {
        self.bus.write_bank_register(value)
    }

    fn read_bank_register(&mut self) -> Result<u8> {
        self.bus.read_bank_register()
    }

    fn write_led_register(&mut self, value: u8) -> Result<()> {
        self.bus.write_led_register(value)
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.bus.read(addr, buf)
    }

    fn read_byte(&mut self, addr: u32) -> Result<u8> {
        self.bus.read_byte(addr)
    }

    fn write_byte(&mut self, addr: u32, value: u8) -> Result<()> {
        self.bus.write_byte(addr, value)
    }
}
