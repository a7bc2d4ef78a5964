//! Error types for the internal programmer

use xenflash_core::error::Error as CoreError;

/// Error type for the internal programmer
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    /// Opening or using /dev/port failed
    #[error("I/O port access failed: {0}")]
    PortAccess(#[source] std::io::Error),

    /// Mapping the flash window failed
    #[error("failed to map memory at {address:#x} (size {size:#x})")]
    MemoryMap {
        /// Physical base address
        address: u64,
        /// Size of the mapping
        size: usize,
    },

    /// Access outside the mapped window
    #[error("window offset {offset:#x} out of range")]
    OutOfRange {
        /// Offending offset
        offset: usize,
    },

    /// A programmer option could not be parsed
    #[error("invalid value '{value}' for option '{key}'")]
    InvalidOption {
        /// Option name
        key: String,
        /// Value given
        value: String,
    },

    /// Operation not supported on this platform
    #[error("not supported: {0}")]
    NotSupported(&'static str),
}

impl From<InternalError> for CoreError {
    fn from(err: InternalError) -> Self {
        log::error!("internal: {}", err);
        match err {
            InternalError::OutOfRange { .. } => CoreError::AddressOutOfBounds,
            _ => CoreError::BusError,
        }
    }
}
