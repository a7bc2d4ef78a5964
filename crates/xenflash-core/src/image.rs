//! Flash image buffers
//!
//! An image is a raw 2 MiB blob with no header or checksum; its structure
//! is defined entirely by the region map.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::error::{Error, Result};
use crate::region::{FlashRegion, FLASH_SIZE};

/// A buffer holding exactly one full flash image
#[derive(Clone, PartialEq, Eq)]
pub struct FlashImage {
    data: Box<[u8]>,
}

impl FlashImage {
    /// Allocate a zero-filled image
    pub fn blank() -> Self {
        Self {
            data: vec![0u8; FLASH_SIZE].into_boxed_slice(),
        }
    }

    /// Take ownership of an existing buffer
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() != FLASH_SIZE {
            return Err(Error::ImageSize {
                expected: FLASH_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self {
            data: data.into_boxed_slice(),
        })
    }

    /// The bytes belonging to one region
    pub fn region(&self, region: &FlashRegion) -> &[u8] {
        &self.data[region.range()]
    }

    /// Mutable access to the bytes belonging to one region
    pub fn region_mut(&mut self, region: &FlashRegion) -> &mut [u8] {
        &mut self.data[region.range()]
    }
}

impl Default for FlashImage {
    fn default() -> Self {
        Self::blank()
    }
}

impl core::fmt::Debug for FlashImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlashImage")
            .field("len", &self.data.len())
            .finish()
    }
}

impl Deref for FlashImage {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for FlashImage {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(feature = "std")]
pub use self::io::ImageError;

#[cfg(feature = "std")]
mod io {
    use std::fs::File;
    use std::io::{Read, Write};
    use std::path::{Path, PathBuf};
    use std::vec::Vec;

    use thiserror::Error;

    use super::FlashImage;
    use crate::error::Error as CoreError;
    use crate::region::FLASH_SIZE;

    /// Errors loading or saving an image
    #[derive(Debug, Error)]
    pub enum ImageError {
        /// The image file could not be opened
        #[error("failed to open {}: {source}", path.display())]
        Open {
            /// Path that was tried
            path: PathBuf,
            /// Underlying I/O error
            #[source]
            source: std::io::Error,
        },

        /// Reading or writing the image failed
        #[error("image I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// The image does not have the device's exact size
        #[error("image must be exactly {expected} bytes, got {actual}")]
        Size {
            /// Required size
            expected: usize,
            /// Size found
            actual: usize,
        },
    }

    impl From<ImageError> for CoreError {
        fn from(_: ImageError) -> Self {
            CoreError::SourceUnavailable
        }
    }

    impl FlashImage {
        /// Read an image from a byte stream
        ///
        /// The stream must contain exactly one flash image.
        pub fn from_reader<R: Read>(reader: R) -> Result<Self, ImageError> {
            let mut data = Vec::with_capacity(FLASH_SIZE);
            reader
                .take(FLASH_SIZE as u64 + 1)
                .read_to_end(&mut data)?;
            if data.len() != FLASH_SIZE {
                let actual = data.len();
                return Err(ImageError::Size {
                    expected: FLASH_SIZE,
                    actual,
                });
            }
            Ok(Self {
                data: data.into_boxed_slice(),
            })
        }

        /// Load an image from a file
        pub fn from_file(path: &Path) -> Result<Self, ImageError> {
            let file = File::open(path).map_err(|source| ImageError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            let image = Self::from_reader(file)?;
            log::info!("Read {} bytes from {}", image.len(), path.display());
            Ok(image)
        }

        /// Save the image to a file
        pub fn write_to_file(&self, path: &Path) -> Result<(), ImageError> {
            let mut file = File::create(path)?;
            file.write_all(&self.data)?;
            log::info!("Wrote {} bytes to {}", self.data.len(), path.display());
            Ok(())
        }
    }
}
