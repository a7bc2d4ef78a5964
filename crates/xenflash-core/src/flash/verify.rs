//! Verification with write-protection masking

use crate::error::{Error, Result};
use crate::flash::check_image_len;
use crate::wp::WRITE_PROTECTED;

/// Outcome of comparing a read-back against its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Verification {
    /// Both images match outside the write-protected sector
    Verified,
    /// At least one byte differs outside the write-protected sector
    Mismatch,
}

impl Verification {
    /// Whether the images matched
    pub fn is_verified(self) -> bool {
        self == Self::Verified
    }

    /// Turn a mismatch into [`Error::VerificationMismatch`]
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Verified => Ok(()),
            Self::Mismatch => Err(Error::VerificationMismatch),
        }
    }
}

/// Compare a read-back against its source
///
/// The write-protected sector is zero-filled in both buffers first, so the
/// caller's buffers are modified.
pub fn verify(source: &mut [u8], readback: &mut [u8]) -> Result<Verification> {
    check_image_len(source.len())?;
    check_image_len(readback.len())?;

    WRITE_PROTECTED.apply(source)?;
    WRITE_PROTECTED.apply(readback)?;

    if source == readback {
        return Ok(Verification::Verified);
    }

    if let Some(offset) = first_mismatch(source, readback) {
        log::debug!(
            "First mismatch at 0x{:06X}: expected 0x{:02X}, got 0x{:02X}",
            offset,
            source[offset],
            readback[offset]
        );
    }
    Ok(Verification::Mismatch)
}

/// Offset of the first differing byte outside the write-protected sector
pub fn first_mismatch(source: &[u8], readback: &[u8]) -> Option<usize> {
    source
        .iter()
        .zip(readback.iter())
        .enumerate()
        .find(|&(offset, (a, b))| a != b && !WRITE_PROTECTED.contains(offset as u32))
        .map(|(offset, _)| offset)
}
