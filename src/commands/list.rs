//! List commands implementation

use xenflash_flash::available_programmers;

/// List all programmers compiled into this build
pub fn list_programmers() {
    println!("Supported programmers:");
    println!();
    for info in available_programmers() {
        let root = if info.requires_root { " [root]" } else { "" };
        println!("  {:<10} - {}{}", info.name, info.description, root);
        if !info.aliases.is_empty() {
            println!("  {:<10}   aliases: {}", "", info.aliases.join(", "));
        }
    }
}
