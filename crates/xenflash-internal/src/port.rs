//! x86 I/O port access through /dev/port
//!
//! Each byte of /dev/port is one I/O port, so a one-byte positioned read or
//! write becomes a single `inb`/`outb`. Requires root.

use crate::error::InternalError;

/// Open handle on the I/O port space
#[cfg(target_os = "linux")]
pub struct IoPorts {
    file: std::fs::File,
}

#[cfg(target_os = "linux")]
impl IoPorts {
    /// Open /dev/port for reading and writing
    pub fn open() -> Result<Self, InternalError> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open("/dev/port")
            .map_err(InternalError::PortAccess)?;
        Ok(Self { file })
    }

    /// Read one byte from a port
    pub fn inb(&self, port: u16) -> Result<u8, InternalError> {
        use std::os::unix::fs::FileExt;

        let mut byte = [0u8];
        self.file
            .read_exact_at(&mut byte, u64::from(port))
            .map_err(InternalError::PortAccess)?;
        Ok(byte[0])
    }

    /// Write one byte to a port
    pub fn outb(&self, port: u16, value: u8) -> Result<(), InternalError> {
        use std::os::unix::fs::FileExt;

        self.file
            .write_all_at(&[value], u64::from(port))
            .map_err(InternalError::PortAccess)
    }
}

#[cfg(not(target_os = "linux"))]
pub struct IoPorts {
    _private: (),
}

#[cfg(not(target_os = "linux"))]
impl IoPorts {
    pub fn open() -> Result<Self, InternalError> {
        Err(InternalError::NotSupported("I/O port access only supported on Linux"))
    }

    pub fn inb(&self, _port: u16) -> Result<u8, InternalError> {
        Err(InternalError::NotSupported("I/O port access only supported on Linux"))
    }

    pub fn outb(&self, _port: u16, _value: u8) -> Result<(), InternalError> {
        Err(InternalError::NotSupported("I/O port access only supported on Linux"))
    }
}
