//! DeviceHandle - owned, type-erased device plus its programmer name

use xenflash_core::bank::BankSelector;
use xenflash_core::error::Result;
use xenflash_core::programmer::XeniumDevice;

/// Owned handle on an opened device
///
/// The CLI works only with this type and never needs to know which backend
/// sits underneath.
pub struct DeviceHandle {
    device: Box<dyn XeniumDevice>,
    programmer: &'static str,
}

impl DeviceHandle {
    pub(crate) fn new(device: Box<dyn XeniumDevice>, programmer: &'static str) -> Self {
        Self { device, programmer }
    }

    /// Name of the programmer that opened the device
    pub fn programmer(&self) -> &'static str {
        self.programmer
    }

    /// Take control of the bank register for one operation
    ///
    /// The selector borrows the handle exclusively, so only one operation
    /// can touch the bank register at a time.
    pub fn selector(&mut self) -> Result<BankSelector<'_, dyn XeniumDevice>> {
        BankSelector::attach(self.device.as_mut())
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("programmer", &self.programmer)
            .finish_non_exhaustive()
    }
}
