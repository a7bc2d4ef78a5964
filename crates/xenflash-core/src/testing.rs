//! Recording fake device for unit tests

use std::vec;
use std::vec::Vec;

use crate::error::{Error, Result};
use crate::programmer::{FlashChip, LpcBus};
use crate::region::{region_for_bank, Bank, FLASH_SIZE};
use crate::wp::WRITE_PROTECTED;

/// A bus or chip access seen by the fake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SelectBank(u8),
    Read { bank: u8, addr: u32, len: usize },
    EraseChip,
    ManufacturerId,
    DeviceId,
}

pub struct FakeDevice {
    pub data: Vec<u8>,
    pub bank_register: u8,
    pub manufacturer: u8,
    pub device: u8,
    /// Refuse to program the write-protected sector like genuine hardware
    pub protect_recovery: bool,
    /// Flip this flat offset on every read
    pub corrupt_read_at: Option<u32>,
    pub events: Vec<Event>,
    pub programmed: usize,
    pub programmed_in_order: bool,
    last_programmed: Option<u32>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            data: vec![0xFF; FLASH_SIZE],
            bank_register: Bank::Cromwell.raw(),
            manufacturer: 0x01,
            device: 0xC4,
            protect_recovery: false,
            corrupt_read_at: None,
            events: Vec::new(),
            programmed: 0,
            programmed_in_order: true,
            last_programmed: None,
        }
    }

    pub fn with_ids(manufacturer: u8, device: u8) -> Self {
        Self {
            manufacturer,
            device,
            ..Self::new()
        }
    }

    pub fn selections(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::SelectBank(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    fn flat(&self, addr: u32, len: usize) -> Result<Option<usize>> {
        let bank = match Bank::from_raw(self.bank_register) {
            Some(bank) => bank,
            None => return Ok(None),
        };
        match region_for_bank(bank) {
            Some(region) if addr as usize + len <= region.size as usize => {
                Ok(Some((region.start + addr) as usize))
            }
            Some(_) => Err(Error::AddressOutOfBounds),
            None => Ok(None),
        }
    }
}

impl LpcBus for FakeDevice {
    fn write_bank_register(&mut self, value: u8) -> Result<()> {
        self.events.push(Event::SelectBank(value));
        self.bank_register = value;
        Ok(())
    }

    fn read_bank_register(&mut self) -> Result<u8> {
        Ok(self.bank_register)
    }

    fn write_led_register(&mut self, _value: u8) -> Result<()> {
        Ok(())
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.events.push(Event::Read {
            bank: self.bank_register,
            addr,
            len: buf.len(),
        });
        match self.flat(addr, buf.len())? {
            Some(start) => {
                buf.copy_from_slice(&self.data[start..start + buf.len()]);
                if let Some(bad) = self.corrupt_read_at {
                    let bad = bad as usize;
                    if bad >= start && bad < start + buf.len() {
                        buf[bad - start] ^= 0xFF;
                    }
                }
            }
            None => buf.fill(0xFF),
        }
        Ok(())
    }

    fn write_byte(&mut self, _addr: u32, _value: u8) -> Result<()> {
        Ok(())
    }
}

impl FlashChip for FakeDevice {
    fn erase_chip(&mut self) -> Result<()> {
        self.events.push(Event::EraseChip);
        for (offset, byte) in self.data.iter_mut().enumerate() {
            if !(self.protect_recovery && WRITE_PROTECTED.contains(offset as u32)) {
                *byte = 0xFF;
            }
        }
        Ok(())
    }

    fn program_byte(&mut self, addr: u32, value: u8) -> Result<()> {
        let flat = self.flat(addr, 1)?.ok_or(Error::AddressOutOfBounds)?;
        if let Some(last) = self.last_programmed {
            if flat as u32 <= last {
                self.programmed_in_order = false;
            }
        }
        self.last_programmed = Some(flat as u32);
        self.programmed += 1;
        if self.protect_recovery && WRITE_PROTECTED.contains(flat as u32) {
            return Ok(());
        }
        self.data[flat] &= value;
        Ok(())
    }

    fn manufacturer_id(&mut self) -> Result<u8> {
        self.events.push(Event::ManufacturerId);
        Ok(self.manufacturer)
    }

    fn device_id(&mut self) -> Result<u8> {
        self.events.push(Event::DeviceId);
        Ok(self.device)
    }
}
