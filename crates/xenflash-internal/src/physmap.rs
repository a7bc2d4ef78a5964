//! Physical memory mapping of the LPC flash window
//!
//! The flash window is mapped from /dev/mem with `O_SYNC` so every access
//! turns into a real bus cycle.
//!
//! # Safety
//!
//! Accessing physical memory is inherently unsafe and requires root
//! privileges. All accesses are bounds checked against the mapping.

use crate::error::InternalError;

/// A mapped region of physical memory
#[cfg(target_os = "linux")]
pub struct PhysMap {
    /// Pointer to the start of the requested range
    ptr: *mut u8,
    /// Requested size
    size: usize,
    /// Size of the page-aligned mapping
    map_size: usize,
    /// Offset of `ptr` from the page-aligned mapping
    page_offset: usize,
    /// Physical address (for error reporting)
    phys_addr: u64,
}

#[cfg(target_os = "linux")]
impl PhysMap {
    /// Map `size` bytes of physical memory starting at `phys_addr`
    pub fn new(phys_addr: u64, size: usize) -> Result<Self, InternalError> {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;
        use std::os::unix::io::AsRawFd;

        let map_err = || InternalError::MemoryMap {
            address: phys_addr,
            size,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open("/dev/mem")
            .map_err(|_| map_err())?;

        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size <= 0 {
            return Err(map_err());
        }
        let page_mask = page_size as usize - 1;
        let page_offset = (phys_addr as usize) & page_mask;
        let aligned_addr = phys_addr & !(page_mask as u64);
        let map_size = (size + page_offset + page_mask) & !page_mask;

        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                map_size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                aligned_addr as libc::off_t,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(map_err());
        }

        log::debug!(
            "Mapped {:#x} bytes at physical {:#x}",
            size,
            phys_addr
        );

        Ok(Self {
            ptr: unsafe { (ptr as *mut u8).add(page_offset) },
            size,
            map_size,
            page_offset,
            phys_addr,
        })
    }

    fn check(&self, offset: usize, len: usize) -> Result<(), InternalError> {
        if offset.checked_add(len).map_or(true, |end| end > self.size) {
            return Err(InternalError::OutOfRange { offset });
        }
        Ok(())
    }

    /// Read one byte
    #[inline]
    pub fn read8(&self, offset: usize) -> Result<u8, InternalError> {
        self.check(offset, 1)?;
        Ok(unsafe { core::ptr::read_volatile(self.ptr.add(offset)) })
    }

    /// Read consecutive bytes, one bus cycle each
    pub fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<(), InternalError> {
        self.check(offset, buf.len())?;
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = unsafe { core::ptr::read_volatile(self.ptr.add(offset + i)) };
        }
        Ok(())
    }

    /// Write one byte
    #[inline]
    pub fn write8(&self, offset: usize, value: u8) -> Result<(), InternalError> {
        self.check(offset, 1)?;
        unsafe { core::ptr::write_volatile(self.ptr.add(offset), value) };
        Ok(())
    }

    /// Get the physical address of this mapping
    pub fn phys_addr(&self) -> u64 {
        self.phys_addr
    }

    /// Get the size of this mapping
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(target_os = "linux")]
impl Drop for PhysMap {
    fn drop(&mut self) {
        unsafe {
            let base = self.ptr.sub(self.page_offset);
            libc::munmap(base as *mut libc::c_void, self.map_size);
        }
    }
}

// The mapping is plain MMIO owned by this value
#[cfg(target_os = "linux")]
unsafe impl Send for PhysMap {}

// Stub for non-Linux platforms
#[cfg(not(target_os = "linux"))]
pub struct PhysMap {
    _private: (),
}

#[cfg(not(target_os = "linux"))]
impl PhysMap {
    pub fn new(_phys_addr: u64, _size: usize) -> Result<Self, InternalError> {
        Err(InternalError::NotSupported("Physical memory mapping only supported on Linux"))
    }

    pub fn read8(&self, _offset: usize) -> Result<u8, InternalError> {
        Err(InternalError::NotSupported("Physical memory mapping only supported on Linux"))
    }

    pub fn read_into(&self, _offset: usize, _buf: &mut [u8]) -> Result<(), InternalError> {
        Err(InternalError::NotSupported("Physical memory mapping only supported on Linux"))
    }

    pub fn write8(&self, _offset: usize, _value: u8) -> Result<(), InternalError> {
        Err(InternalError::NotSupported("Physical memory mapping only supported on Linux"))
    }

    pub fn phys_addr(&self) -> u64 {
        0
    }

    pub fn size(&self) -> usize {
        0
    }
}
