//! Error types for xenflash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

use crate::region::Bank;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Session errors
    /// The probe handshake did not return the expected identity
    DeviceNotPresent {
        /// Manufacturer code read back from the chip
        manufacturer: u8,
        /// Device code read back from the chip
        device: u8,
    },
    /// The source image could not be obtained from storage
    SourceUnavailable,
    /// Read-back differs from the source outside the write-protected mask
    VerificationMismatch,

    // Buffer errors
    /// A flash image buffer does not have the device's exact size
    ImageSize {
        /// Required size in bytes
        expected: usize,
        /// Size of the buffer that was passed in
        actual: usize,
    },
    /// Address is beyond the flash or region size
    AddressOutOfBounds,

    // Bank errors
    /// Bank-relative I/O was issued against a bank that is not selected
    BankNotSelected {
        /// Bank the caller assumed to be selected
        expected: Bank,
        /// Raw value currently in the bank register
        selected: u8,
    },

    // Hardware errors
    /// The chip did not finish an erase or program operation in time
    Timeout,
    /// Host-side access to the bus failed
    BusError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotPresent {
                manufacturer,
                device,
            } => write!(
                f,
                "device not detected (manufacturer 0x{:02X}, device 0x{:02X})",
                manufacturer, device
            ),
            Self::SourceUnavailable => write!(f, "source image unavailable"),
            Self::VerificationMismatch => write!(f, "verify failed: data mismatch"),
            Self::ImageSize { expected, actual } => write!(
                f,
                "image must be exactly {} bytes, got {} bytes",
                expected, actual
            ),
            Self::AddressOutOfBounds => write!(f, "address out of bounds"),
            Self::BankNotSelected { expected, selected } => write!(
                f,
                "bank {} ({}) is not selected (bank register holds {})",
                *expected as u8,
                expected.name(),
                selected
            ),
            Self::Timeout => write!(f, "operation timed out"),
            Self::BusError => write!(f, "bus access failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
