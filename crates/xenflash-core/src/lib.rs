//! xenflash-core - Bank-switched flash programming for Xenium-class modchips
//!
//! The device carries a 2 MiB flash chip behind the console's LPC bus, but
//! the bus only exposes a 1 MiB window. The flash is therefore split into
//! four regions, each reached by writing a bank number to an I/O register
//! before touching the window.
//!
//! This crate provides the pieces needed to drive such a device safely:
//!
//! - [`region`] - the static region map and address translation
//! - [`bank`] - the [`BankSelector`](bank::BankSelector), the only thing
//!   allowed to change the bank register
//! - [`probe`] - the wake-up handshake and identity check
//! - [`flash`] - dump, erase, program and verify engines plus the
//!   full programming session
//! - [`wp`] - the write-protected sector mask used during verification
//! - [`chip`] - the AM29LV160 command set on top of a raw bus
//! - [`image`] and `config` - image files and the TOML configuration
//!
//! The hardware itself is reached through the traits in [`programmer`].
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`, config files)
//! - `alloc` - Enable heap allocated flash images
//!
//! # Example
//!
//! ```ignore
//! use xenflash_core::bank::BankSelector;
//! use xenflash_core::flash::{self, NoProgress};
//! use xenflash_core::image::FlashImage;
//!
//! let mut source = FlashImage::from_file(path)?;
//! let mut readback = FlashImage::blank();
//!
//! let mut selector = BankSelector::attach(&mut device)?;
//! let outcome = flash::run_session(&mut selector, &mut source, &mut readback, &mut NoProgress);
//! selector.restore_boot_bank()?;
//! outcome?.into_result()?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod bank;
pub mod chip;
#[cfg(feature = "std")]
pub mod config;
pub mod error;
pub mod flash;
#[cfg(feature = "alloc")]
pub mod image;
pub mod led;
pub mod probe;
pub mod programmer;
pub mod region;
pub mod wp;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
