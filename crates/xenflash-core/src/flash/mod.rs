//! High-level flash operations
//!
//! This module provides the engines that walk the whole flash region by
//! region: dump, erase, program and verify, plus the full programming
//! session that chains them.

mod dump;
mod program;
mod progress;
mod session;
mod verify;

pub use dump::{dump, dump_region, CHUNK_SIZE};
pub use program::{erase_chip, program, PROGRESS_STEP};
pub use progress::{NoProgress, SessionProgress};
pub use session::run_session;
pub use verify::{first_mismatch, verify, Verification};

use crate::error::{Error, Result};
use crate::region::FLASH_SIZE;

/// Check that a buffer holds exactly one full flash image
pub(crate) fn check_image_len(len: usize) -> Result<()> {
    if len != FLASH_SIZE {
        return Err(Error::ImageSize {
            expected: FLASH_SIZE,
            actual: len,
        });
    }
    Ok(())
}
