//! Progress notifications

use crate::flash::Verification;
use crate::region::FlashRegion;

/// Receives coarse notifications while the engines run
///
/// All methods have empty default implementations.
pub trait SessionProgress {
    /// Full-chip erase is starting
    fn erasing(&mut self) {}

    /// Full-chip erase has finished
    fn erase_complete(&mut self) {}

    /// A plain dump of `total_bytes` is starting
    fn reading(&mut self, _total_bytes: usize) {}

    /// Programming of `total_bytes` is starting
    fn writing(&mut self, _total_bytes: usize) {}

    /// The verification read of `total_bytes` is starting
    fn verifying(&mut self, _total_bytes: usize) {}

    /// The engine has switched to a new region
    fn region(&mut self, _region: &FlashRegion) {}

    /// `bytes_done` bytes of the current phase are finished
    fn progress(&mut self, _bytes_done: usize) {}

    /// The session finished with the given outcome
    fn complete(&mut self, _outcome: Verification) {}
}

/// Progress receiver that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl SessionProgress for NoProgress {}
