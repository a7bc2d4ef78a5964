//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xenflash_core::config::Variant;
use xenflash_core::led::Led;

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer to use [available: {}] (default: from config, else internal)",
        xenflash_flash::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "xenflash")]
#[command(author, version, about = "Xenium modchip flash tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./xenflash.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = programmer_help())]
    pub programmer: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the wake-up handshake and check the device identity
    Probe,

    /// Dump the flash (or one region) to a file
    Read {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Dump only this region (bios, xeniumos, bootloader, recovery)
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Erase, program and verify a full 2 MiB image
    Write {
        /// Image file (overrides --variant)
        #[arg(short, long, conflicts_with = "variant")]
        input: Option<PathBuf>,

        /// Firmware variant to write (gold, blue, ice)
        #[arg(long)]
        variant: Option<Variant>,
    },

    /// Compare the flash against an image file
    Verify {
        /// Image file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Erase the whole chip
    Erase {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Set the status LED
    Led {
        /// Colour (off, red, green, amber, blue, purple, teal, white);
        /// defaults to the configured colour
        color: Option<Led>,

        /// Step through every colour once, ending with the LED off
        #[arg(long, conflicts_with = "color")]
        cycle: bool,
    },

    /// Show the flash region map
    Layout,

    /// List available programmers
    ListProgrammers,
}
