//! Write-protected sector handling
//!
//! Genuine devices ship with the first 128 KiB of the recovery region
//! hardware write-protected. Programming it silently does nothing, so a
//! read-back never matches the source there. Verification blanks this range
//! in both images before comparing.

use core::ops::Range;

use crate::error::{Error, Result};
use crate::region::{FLASH_SIZE, RECOVERY};

/// A range of the flat flash image excluded from verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteProtectedMask {
    /// First masked offset
    pub start: u32,
    /// Length of the masked range in bytes
    pub len: u32,
}

/// The sector protected on genuine hardware
pub const WRITE_PROTECTED: WriteProtectedMask = WriteProtectedMask::new(0x1C_0000, 0x2_0000);

const _: () = assert!(
    WRITE_PROTECTED.start >= RECOVERY.start && WRITE_PROTECTED.end() <= RECOVERY.end()
);

impl WriteProtectedMask {
    /// Create a new mask
    pub const fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Offset one past the last masked byte
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }

    /// Check if an offset is masked
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Check if the mask overlaps `[start, start + len)`
    pub fn overlaps(&self, start: u32, len: u32) -> bool {
        len != 0 && self.len != 0 && start < self.end() && self.start < start + len
    }

    /// Byte range of the mask inside a flat image
    pub const fn range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// Zero-fill the masked range of a full flash image
    ///
    /// Applying the mask more than once has no further effect.
    pub fn apply(&self, image: &mut [u8]) -> Result<()> {
        if image.len() != FLASH_SIZE {
            return Err(Error::ImageSize {
                expected: FLASH_SIZE,
                actual: image.len(),
            });
        }
        image[self.range()].fill(0x00);
        Ok(())
    }
}
