//! Internal programmer implementing LpcBus
//!
//! Drives the device directly from the console it is installed in: the
//! bank and LED registers through I/O ports, the flash through the memory
//! mapped LPC window.

use xenflash_core::chip::Am29lv160;
use xenflash_core::error::Result as CoreResult;
use xenflash_core::programmer::{LpcBus, ProgrammerInfo, BANK_REGISTER_PORT, LED_REGISTER_PORT};
use xenflash_core::region::WINDOW_SIZE;

use crate::error::InternalError;
use crate::physmap::PhysMap;
use crate::port::IoPorts;

/// Physical address of the LPC flash window
pub const DEFAULT_WINDOW_BASE: u64 = 0xFF00_0000;

/// Options for the internal programmer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalOptions {
    /// Physical base address of the flash window
    pub window_base: u64,
}

impl Default for InternalOptions {
    fn default() -> Self {
        Self {
            window_base: DEFAULT_WINDOW_BASE,
        }
    }
}

impl InternalOptions {
    /// Parse options from key-value pairs (from CLI)
    ///
    /// Supported options:
    /// - base=<physical address of the flash window>
    pub fn from_options(options: &[(&str, &str)]) -> Result<Self, InternalError> {
        let mut opts = Self::default();

        for (key, value) in options {
            match *key {
                "base" => {
                    opts.window_base = parse_address(value).ok_or_else(|| {
                        InternalError::InvalidOption {
                            key: key.to_string(),
                            value: value.to_string(),
                        }
                    })?;
                }
                _ => {
                    log::warn!("Unknown internal programmer option: {}={}", key, value);
                }
            }
        }

        Ok(opts)
    }
}

fn parse_address(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

/// Bus access from the host console
pub struct InternalLpc {
    ports: IoPorts,
    window: PhysMap,
}

impl InternalLpc {
    /// Open the I/O ports and map the flash window
    pub fn open(options: &InternalOptions) -> Result<Self, InternalError> {
        let ports = IoPorts::open()?;
        let window = PhysMap::new(options.window_base, WINDOW_SIZE as usize)?;
        log::info!(
            "Internal LPC access, flash window at {:#x}",
            window.phys_addr()
        );
        Ok(Self { ports, window })
    }
}

impl LpcBus for InternalLpc {
    fn write_bank_register(&mut self, value: u8) -> CoreResult<()> {
        Ok(self.ports.outb(BANK_REGISTER_PORT, value)?)
    }

    fn read_bank_register(&mut self) -> CoreResult<u8> {
        Ok(self.ports.inb(BANK_REGISTER_PORT)?)
    }

    fn write_led_register(&mut self, value: u8) -> CoreResult<()> {
        Ok(self.ports.outb(LED_REGISTER_PORT, value)?)
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> CoreResult<()> {
        Ok(self.window.read_into(addr as usize, buf)?)
    }

    fn read_byte(&mut self, addr: u32) -> CoreResult<u8> {
        Ok(self.window.read8(addr as usize)?)
    }

    fn write_byte(&mut self, addr: u32, value: u8) -> CoreResult<()> {
        Ok(self.window.write8(addr as usize, value)?)
    }
}

/// Open the internal programmer with the AM29LV160 driver on top
pub fn open_internal(options: &InternalOptions) -> Result<Am29lv160<InternalLpc>, InternalError> {
    Ok(Am29lv160::new(InternalLpc::open(options)?))
}

/// Programmer information
pub fn programmer_info() -> ProgrammerInfo {
    ProgrammerInfo {
        name: "internal",
        aliases: &["lpc"],
        description: "Direct LPC access from the console the device is installed in",
        requires_root: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = InternalOptions::from_options(&[]).unwrap();
        assert_eq!(opts.window_base, 0xFF00_0000);
    }

    #[test]
    fn test_base_option() {
        let opts = InternalOptions::from_options(&[("base", "0xFFF00000")]).unwrap();
        assert_eq!(opts.window_base, 0xFFF0_0000);

        let opts = InternalOptions::from_options(&[("base", "4278190080")]).unwrap();
        assert_eq!(opts.window_base, 0xFF00_0000);
    }

    #[test]
    fn test_bad_base_option() {
        assert!(matches!(
            InternalOptions::from_options(&[("base", "0xZZ")]),
            Err(InternalError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_unknown_option_is_ignored() {
        let opts = InternalOptions::from_options(&[("speed", "fast")]).unwrap();
        assert_eq!(opts, InternalOptions::default());
    }
}
