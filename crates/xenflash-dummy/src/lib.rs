//! xenflash-dummy - In-memory Xenium emulator for testing
//!
//! This crate emulates a Xenium-class device at the bus level: the bank and
//! LED registers, the banked 1 MiB flash window, and the AM29LV160 command
//! state machine behind it. Wrap it in
//! [`Am29lv160`](xenflash_core::chip::Am29lv160) to get a complete device.
//!
//! Two behaviours of genuine hardware can be switched on:
//!
//! - the write-protected sector refuses program and erase
//! - the chip only answers identity queries after the wake-up handshake

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use xenflash_core::error::{Error, Result};
use xenflash_core::probe::{EXPECTED_DEVICE, EXPECTED_MANUFACTURER, WAKE_READ_ADDR};
use xenflash_core::programmer::{LpcBus, ProgrammerInfo};
use xenflash_core::region::{Bank, FLASH_SIZE, WINDOW_SIZE};
use xenflash_core::wp::WRITE_PROTECTED;

/// Configuration for the emulated device
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Manufacturer code returned in autoselect mode
    pub manufacturer_id: u8,
    /// Device code returned in autoselect mode
    pub device_id: u8,
    /// Protect the write-protected sector like genuine hardware
    pub genuine: bool,
    /// Return 0xFF for identity queries until the wake-up handshake is seen
    pub wake_quirk: bool,
    /// Value of the bank register at power-up
    pub boot_bank: u8,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            manufacturer_id: EXPECTED_MANUFACTURER,
            device_id: EXPECTED_DEVICE,
            genuine: true,
            wake_quirk: true,
            boot_bank: Bank::Cromwell.raw(),
        }
    }
}

/// Part of the flash a bank maps into the window, as `(start, size)`
///
/// The TSOP bank points at the console's own flash and is not emulated.
fn bank_window(bank: u8) -> Option<(usize, usize)> {
    const K256: usize = 0x4_0000;
    const K512: usize = 0x8_0000;
    match Bank::from_raw(bank)? {
        Bank::Tsop => None,
        Bank::Cromwell => Some((0x18_0000, K256)),
        Bank::XeniumOs => Some((0x10_0000, K512)),
        Bank::Recovery => Some((0x1C_0000, K256)),
        Bank::Bios1M => Some((0, WINDOW_SIZE as usize)),
        b @ (Bank::Bios256K1 | Bank::Bios256K2 | Bank::Bios256K3 | Bank::Bios256K4) => {
            Some(((b.raw() - Bank::Bios256K1.raw()) as usize * K256, K256))
        }
        b @ (Bank::Bios512K1 | Bank::Bios512K2) => {
            Some(((b.raw() - Bank::Bios512K1.raw()) as usize * K512, K512))
        }
    }
}

/// AM29LV160 command decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmdState {
    Read,
    Unlock1,
    Unlock2,
    ProgramArmed,
    EraseSetup,
    EraseUnlock1,
    EraseUnlock2,
    Autoselect,
}

/// Dummy Xenium device
///
/// Embedded operations complete instantly, so the DQ6 toggle bit never
/// toggles.
#[cfg(feature = "alloc")]
pub struct DummyXenium {
    config: DummyConfig,
    data: Vec<u8>,
    bank: u8,
    led: u8,
    state: CmdState,
    wake_stage: usize,
    bank_writes: Vec<u8>,
    erase_count: usize,
}

#[cfg(feature = "alloc")]
impl DummyXenium {
    /// Create an erased device with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            bank: config.boot_bank,
            config,
            data: vec![0xFF; FLASH_SIZE],
            led: 0,
            state: CmdState::Read,
            wake_stage: 0,
            bank_writes: Vec::new(),
            erase_count: 0,
        }
    }

    /// Create a genuine device with default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a device with pre-filled flash contents
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut dev = Self::new(config);
        let len = core::cmp::min(initial_data.len(), dev.data.len());
        dev.data[..len].copy_from_slice(&initial_data[..len]);
        dev
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Current value of the bank register
    pub fn bank_register(&self) -> u8 {
        self.bank
    }

    /// Every value written to the bank register, oldest first
    pub fn bank_writes(&self) -> &[u8] {
        &self.bank_writes
    }

    /// Current value of the LED register
    pub fn led(&self) -> u8 {
        self.led
    }

    /// Number of completed chip erases
    pub fn erase_count(&self) -> usize {
        self.erase_count
    }

    /// Whether the wake-up handshake has been seen
    pub fn is_awake(&self) -> bool {
        !self.config.wake_quirk || self.wake_stage == WAKE_SEQUENCE.len()
    }

    fn flat_address(&self, addr: u32) -> Option<usize> {
        let (start, size) = bank_window(self.bank)?;
        // Small banks alias across the window.
        Some(start + addr as usize % size)
    }

    fn is_protected(&self, flat: usize) -> bool {
        self.config.genuine && WRITE_PROTECTED.contains(flat as u32)
    }

    fn advance_wake(&mut self, event: WakeEvent) {
        if self.is_awake() {
            return;
        }
        if WAKE_SEQUENCE[self.wake_stage] == event {
            self.wake_stage += 1;
        } else {
            self.wake_stage = usize::from(WAKE_SEQUENCE[0] == event);
        }
    }

    fn program(&mut self, addr: u32, value: u8) {
        let Some(flat) = self.flat_address(addr) else {
            log::trace!("dummy: program outside emulated flash ignored");
            return;
        };
        if self.is_protected(flat) {
            log::trace!("dummy: program at 0x{:06X} refused (protected)", flat);
            return;
        }
        // Programming can only clear bits
        self.data[flat] &= value;
    }

    fn erase(&mut self) {
        for offset in 0..self.data.len() {
            if !self.is_protected(offset) {
                self.data[offset] = 0xFF;
            }
        }
        self.erase_count += 1;
        log::debug!("dummy: chip erased");
    }

    fn read_one(&self, addr: u32) -> u8 {
        if self.state == CmdState::Autoselect {
            if !self.is_awake() {
                return 0xFF;
            }
            return match addr {
                0x00 => self.config.manufacturer_id,
                0x02 => self.config.device_id,
                _ => 0x00,
            };
        }
        match self.flat_address(addr) {
            Some(flat) => self.data[flat],
            None => 0xFF,
        }
    }
}

/// Bus event relevant to the wake-up handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WakeEvent {
    Read,
    Select(u8),
}

const WAKE_SEQUENCE: [WakeEvent; 6] = [
    WakeEvent::Read,
    WakeEvent::Select(Bank::XeniumOs.raw()),
    WakeEvent::Read,
    WakeEvent::Select(Bank::Recovery.raw()),
    WakeEvent::Read,
    WakeEvent::Select(Bank::Cromwell.raw()),
];

#[cfg(feature = "alloc")]
impl LpcBus for DummyXenium {
    fn write_bank_register(&mut self, value: u8) -> Result<()> {
        self.bank = value & 0x0F;
        self.bank_writes.push(value);
        self.advance_wake(WakeEvent::Select(value));
        Ok(())
    }

    fn read_bank_register(&mut self) -> Result<u8> {
        Ok(self.bank)
    }

    fn write_led_register(&mut self, value: u8) -> Result<()> {
        self.led = value & 0x07;
        Ok(())
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        if addr as usize + buf.len() > WINDOW_SIZE as usize {
            return Err(Error::AddressOutOfBounds);
        }
        if addr == WAKE_READ_ADDR {
            self.advance_wake(WakeEvent::Read);
        }
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.read_one(addr + i as u32);
        }
        Ok(())
    }

    fn write_byte(&mut self, addr: u32, value: u8) -> Result<()> {
        if addr >= WINDOW_SIZE {
            return Err(Error::AddressOutOfBounds);
        }

        // Reset is accepted in any state
        if value == 0xF0 && self.state != CmdState::ProgramArmed {
            self.state = CmdState::Read;
            return Ok(());
        }

        self.state = match (self.state, addr & 0xFFF, value) {
            (CmdState::Read | CmdState::Autoselect, 0xAAA, 0xAA) => CmdState::Unlock1,
            (CmdState::Unlock1, 0x555, 0x55) => CmdState::Unlock2,
            (CmdState::Unlock2, 0xAAA, 0xA0) => CmdState::ProgramArmed,
            (CmdState::Unlock2, 0xAAA, 0x80) => CmdState::EraseSetup,
            (CmdState::Unlock2, 0xAAA, 0x90) => CmdState::Autoselect,
            (CmdState::EraseSetup, 0xAAA, 0xAA) => CmdState::EraseUnlock1,
            (CmdState::EraseUnlock1, 0x555, 0x55) => CmdState::EraseUnlock2,
            (CmdState::EraseUnlock2, 0xAAA, 0x10) => {
                self.erase();
                CmdState::Read
            }
            (CmdState::ProgramArmed, _, _) => {
                self.program(addr, value);
                CmdState::Read
            }
            (CmdState::Autoselect, _, _) => CmdState::Autoselect,
            (state, addr, value) => {
                log::trace!(
                    "dummy: unexpected write 0x{:03X}<-0x{:02X} in {:?}",
                    addr,
                    value,
                    state
                );
                CmdState::Read
            }
        };
        Ok(())
    }
}

/// Programmer information
pub fn programmer_info() -> ProgrammerInfo {
    ProgrammerInfo {
        name: "dummy",
        aliases: &["emulator"],
        description: "In-memory Xenium emulator for testing",
        requires_root: false,
    }
}
