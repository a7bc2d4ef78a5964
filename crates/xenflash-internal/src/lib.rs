//! xenflash-internal - Direct LPC access to a Xenium device
//!
//! This crate drives a Xenium device from the console it is soldered into,
//! which is the only place its LPC bus is reachable:
//!
//! - the bank register (port 0xEF) and LED register (port 0xEE) through
//!   /dev/port
//! - the 1 MiB flash window through a /dev/mem mapping
//!
//! Both need root. Only Linux is supported; elsewhere opening the
//! programmer fails with [`InternalError::NotSupported`].

pub mod error;
pub mod physmap;
pub mod port;
pub mod programmer;

pub use error::InternalError;
pub use physmap::PhysMap;
pub use port::IoPorts;
pub use programmer::{
    open_internal, programmer_info, InternalLpc, InternalOptions, DEFAULT_WINDOW_BASE,
};

/// Result type for internal programmer operations
pub type Result<T> = core::result::Result<T, InternalError>;
