//! Flash chip drivers
//!
//! The engines only need the [`FlashChip`](crate::programmer::FlashChip)
//! trait. Backends that expose raw bus cycles can wrap themselves in one of
//! these drivers to get it.

mod am29lv160;

pub use am29lv160::{Am29lv160, ERASE_MAX_POLLS, PROGRAM_MAX_POLLS};
