//! Region map
//!
//! The 2 MiB flash is larger than the 1 MiB LPC window, so the device splits
//! it into four regions. Each region is reached through its own bank number
//! written to the bank register; addresses inside the window are then
//! relative to the region start.
//!
//! ```text
//! 0x000000 +-----------------+ bank 9  (1 MiB BIOS bank)
//!          |   BIOS Banks    |
//! 0x100000 +-----------------+ bank 2
//!          |    XeniumOS     |
//! 0x180000 +-----------------+ bank 1
//!          |   Boot Loader   |
//! 0x1C0000 +-----------------+ bank 10
//!          |    Recovery     |
//! 0x200000 +-----------------+
//! ```

use core::ops::Range;

/// Total flash capacity in bytes
pub const FLASH_SIZE: usize = 0x20_0000;

/// Size of the memory window the LPC bus exposes for the selected bank
pub const WINDOW_SIZE: u32 = 0x10_0000;

/// Values understood by the bank register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Bank {
    /// Console's onboard TSOP flash (modchip disabled)
    Tsop = 0,
    /// Boot loader bank
    Cromwell = 1,
    /// Menu firmware bank
    XeniumOs = 2,
    /// First 256 KiB BIOS bank
    Bios256K1 = 3,
    /// Second 256 KiB BIOS bank
    Bios256K2 = 4,
    /// Third 256 KiB BIOS bank
    Bios256K3 = 5,
    /// Fourth 256 KiB BIOS bank
    Bios256K4 = 6,
    /// First 512 KiB BIOS bank
    Bios512K1 = 7,
    /// Second 512 KiB BIOS bank
    Bios512K2 = 8,
    /// Whole 1 MiB BIOS area
    Bios1M = 9,
    /// Recovery bank
    Recovery = 10,
}

impl Bank {
    /// Decode a raw bank register value
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Tsop,
            1 => Self::Cromwell,
            2 => Self::XeniumOs,
            3 => Self::Bios256K1,
            4 => Self::Bios256K2,
            5 => Self::Bios256K3,
            6 => Self::Bios256K4,
            7 => Self::Bios512K1,
            8 => Self::Bios512K2,
            9 => Self::Bios1M,
            10 => Self::Recovery,
            _ => return None,
        })
    }

    /// Raw value written to the bank register
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tsop => "TSOP",
            Self::Cromwell => "Cromwell",
            Self::XeniumOs => "XeniumOS",
            Self::Bios256K1 => "BIOS 256K #1",
            Self::Bios256K2 => "BIOS 256K #2",
            Self::Bios256K3 => "BIOS 256K #3",
            Self::Bios256K4 => "BIOS 256K #4",
            Self::Bios512K1 => "BIOS 512K #1",
            Self::Bios512K2 => "BIOS 512K #2",
            Self::Bios1M => "BIOS 1M",
            Self::Recovery => "Recovery",
        }
    }
}

/// A bank-switched region of the flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashRegion {
    /// Short identifier used on the command line
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Offset of the first byte in the flat image
    pub start: u32,
    /// Size in bytes
    pub size: u32,
    /// Bank that maps this region into the LPC window
    pub bank: Bank,
}

impl FlashRegion {
    /// Offset one past the last byte of the region
    pub const fn end(&self) -> u32 {
        self.start + self.size
    }

    /// Check if a flat offset is within this region
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Byte range of this region inside a flat image
    pub const fn range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

/// All regions in ascending address order
pub const REGIONS: [FlashRegion; 4] = [
    FlashRegion {
        id: "bios",
        name: "BIOS Banks",
        start: 0x00_0000,
        size: 0x10_0000,
        bank: Bank::Bios1M,
    },
    FlashRegion {
        id: "xeniumos",
        name: "XeniumOS",
        start: 0x10_0000,
        size: 0x08_0000,
        bank: Bank::XeniumOs,
    },
    FlashRegion {
        id: "bootloader",
        name: "Boot Loader",
        start: 0x18_0000,
        size: 0x04_0000,
        bank: Bank::Cromwell,
    },
    FlashRegion {
        id: "recovery",
        name: "Recovery",
        start: 0x1C_0000,
        size: 0x04_0000,
        bank: Bank::Recovery,
    },
];

/// The region holding the recovery firmware
pub const RECOVERY: &FlashRegion = &REGIONS[3];

const fn regions_tile(regions: &[FlashRegion], total: usize) -> bool {
    let mut expected_start = 0u32;
    let mut i = 0;
    while i < regions.len() {
        let region = &regions[i];
        if region.start != expected_start || region.size == 0 || region.size > WINDOW_SIZE {
            return false;
        }
        expected_start = region.end();
        i += 1;
    }
    expected_start as usize == total
}

const _: () = assert!(regions_tile(&REGIONS, FLASH_SIZE));

/// Find the region owning a flat offset
///
/// Returns the region together with the bank-relative address to use once
/// the region's bank is selected.
pub fn locate(offset: u32) -> Option<(&'static FlashRegion, u32)> {
    REGIONS
        .iter()
        .find(|r| r.contains(offset))
        .map(|r| (r, offset - r.start))
}

/// Find a region by its id or display name (case-insensitive)
pub fn region_by_name(name: &str) -> Option<&'static FlashRegion> {
    REGIONS
        .iter()
        .find(|r| r.id.eq_ignore_ascii_case(name) || r.name.eq_ignore_ascii_case(name))
}

/// Find the region mapped by a bank, if any
pub fn region_for_bank(bank: Bank) -> Option<&'static FlashRegion> {
    REGIONS.iter().find(|r| r.bank == bank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_tile_flash() {
        let mut sorted = REGIONS.to_vec();
        sorted.sort_by_key(|r| r.start);

        let mut next = 0u32;
        for region in &sorted {
            assert_eq!(region.start, next, "gap or overlap at {}", region.name);
            next = region.end();
        }
        assert_eq!(next as usize, FLASH_SIZE);
    }

    #[test]
    fn test_region_sizes() {
        assert_eq!(REGIONS[0].size, 0x10_0000);
        assert_eq!(REGIONS[1].size, 0x08_0000);
        assert_eq!(REGIONS[2].size, 0x04_0000);
        assert_eq!(REGIONS[3].size, 0x04_0000);
        assert!(REGIONS.iter().all(|r| r.size <= WINDOW_SIZE));
    }

    #[test]
    fn test_tiling_check_rejects_gaps() {
        let mut broken = REGIONS;
        broken[2].start += 0x100;
        assert!(!regions_tile(&broken, FLASH_SIZE));
        assert!(!regions_tile(&REGIONS[..3], FLASH_SIZE));
    }

    #[test]
    fn test_locate_boundaries() {
        assert_eq!(locate(0).map(|(r, a)| (r.bank, a)), Some((Bank::Bios1M, 0)));
        assert_eq!(
            locate(0x0F_FFFF).map(|(r, a)| (r.bank, a)),
            Some((Bank::Bios1M, 0x0F_FFFF))
        );
        assert_eq!(
            locate(0x10_0000).map(|(r, a)| (r.bank, a)),
            Some((Bank::XeniumOs, 0))
        );
        assert_eq!(
            locate(0x18_0000).map(|(r, a)| (r.bank, a)),
            Some((Bank::Cromwell, 0))
        );
        assert_eq!(
            locate(0x1C_0010).map(|(r, a)| (r.bank, a)),
            Some((Bank::Recovery, 0x10))
        );
        assert_eq!(
            locate(0x1F_FFFF).map(|(r, a)| (r.bank, a)),
            Some((Bank::Recovery, 0x3_FFFF))
        );
        assert!(locate(FLASH_SIZE as u32).is_none());
    }

    #[test]
    fn test_bank_raw_values() {
        for raw in 0..=10u8 {
            let bank = Bank::from_raw(raw).unwrap();
            assert_eq!(bank.raw(), raw);
        }
        assert_eq!(Bank::from_raw(11), None);
        assert_eq!(Bank::from_raw(0xFF), None);
    }

    #[test]
    fn test_region_lookup() {
        assert_eq!(region_by_name("RECOVERY"), Some(RECOVERY));
        assert_eq!(region_by_name("Boot Loader").map(|r| r.bank), Some(Bank::Cromwell));
        assert_eq!(region_by_name("tsop"), None);
        assert_eq!(region_for_bank(Bank::XeniumOs).map(|r| r.start), Some(0x10_0000));
        assert_eq!(region_for_bank(Bank::Tsop), None);
    }
}
