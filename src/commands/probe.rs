//! Probe command

use xenflash_core::probe::{self, DeviceIdentity};

use super::{with_device, CommandResult};

/// Run the wake-up handshake and report the device identity
pub fn run(programmer: &str) -> CommandResult {
    with_device(programmer, |selector| {
        let identity = probe::read_identity(selector)?;
        println!("Boot bank:    {}", selector.boot_bank().name());
        println!("Manufacturer: 0x{:02X}", identity.manufacturer);
        println!("Device:       0x{:02X}", identity.device);

        if identity.is_expected() {
            println!("Xenium detected");
            Ok(())
        } else {
            Err(format!(
                "No Xenium detected (got {}, expected {})",
                identity,
                DeviceIdentity::EXPECTED
            )
            .into())
        }
    })
}
