//! CLI command implementations
//!
//! Every command that touches the device runs inside [`with_device`], which
//! opens the programmer, attaches a bank selector and puts the boot bank
//! back afterwards whether the command succeeded or not.

pub mod erase;
pub mod layout;
pub mod led;
mod list;
pub mod probe;
mod progress;
pub mod read;
pub mod verify;
pub mod write;

pub use list::list_programmers;
pub use progress::IndicatifProgress;

use xenflash_core::bank::BankSelector;
use xenflash_core::programmer::XeniumDevice;
use xenflash_flash::open_device;

/// Result type shared by the commands
pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Run `op` against the device behind `programmer`
pub fn with_device<T, F>(programmer: &str, op: F) -> CommandResult<T>
where
    F: FnOnce(&mut BankSelector<'_, dyn XeniumDevice>) -> CommandResult<T>,
{
    let mut handle = open_device(programmer)?;
    log::debug!("Using {} programmer", handle.programmer());
    let mut selector = handle.selector()?;

    let result = op(&mut selector);

    match selector.restore_boot_bank() {
        Ok(()) => result,
        Err(e) => {
            log::error!(
                "Failed to restore boot bank {}: {}",
                selector.boot_bank().name(),
                e
            );
            // The command's own error is the more useful one to report
            result.and(Err(e.into()))
        }
    }
}
