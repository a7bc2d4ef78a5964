//! Layout command

use xenflash_core::region::{FLASH_SIZE, REGIONS};
use xenflash_core::wp::WRITE_PROTECTED;

/// Print the region map
pub fn show() {
    println!(
        "{:<12} {:<12} {:>10} {:>10} {:>8}  Bank",
        "Id", "Name", "Start", "End", "Size"
    );
    println!("{}", "-".repeat(66));
    for region in &REGIONS {
        println!(
            "{:<12} {:<12} {:>#10x} {:>#10x} {:>7}K  {} ({}){}",
            region.id,
            region.name,
            region.start,
            region.end() - 1,
            region.size / 1024,
            region.bank.raw(),
            region.bank.name(),
            if WRITE_PROTECTED.overlaps(region.start, region.size) {
                " [wp]"
            } else {
                ""
            }
        );
    }
    println!();
    println!("Total: {} KiB", FLASH_SIZE / 1024);
    println!(
        "[wp] Write-protected on genuine devices (ignored by verify): {:#x}-{:#x}",
        WRITE_PROTECTED.start,
        WRITE_PROTECTED.end() - 1
    );
}
