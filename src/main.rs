//! xenflash - Flash tool for Xenium-class modchips
//!
//! The device's 2 MiB flash is only reachable through a 1 MiB LPC window,
//! switched between four regions by a bank register. Every command here
//! goes through the engines in `xenflash-core`, which own bank selection,
//! the wake-up handshake and masked verification.
//!
//! Each command restores the bank the console booted from before it exits,
//! including on failure.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use xenflash_core::config::Config;

/// Programmer used when neither the command line nor the config names one
const DEFAULT_PROGRAMMER: &str = "internal";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still overrides the verbosity flags
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let programmer = cli
        .programmer
        .clone()
        .or_else(|| config.programmer.clone())
        .unwrap_or_else(|| DEFAULT_PROGRAMMER.to_string());

    let result = match cli.command {
        Commands::Probe => commands::probe::run(&programmer),
        Commands::Read { output, region } => {
            commands::read::run(&programmer, &output, region.as_deref())
        }
        Commands::Write { input, variant } => {
            let path = match input {
                Some(path) => path,
                None => {
                    let variant = variant.unwrap_or(config.variant);
                    log::info!("Writing {} firmware", variant);
                    config.image_path(variant)
                }
            };
            commands::write::run(&programmer, &path, config.led)
        }
        Commands::Verify { input } => commands::verify::run(&programmer, &input),
        Commands::Erase { yes } => commands::erase::run(&programmer, yes),
        Commands::Led { color, cycle } => {
            if cycle {
                commands::led::cycle(&programmer)
            } else {
                commands::led::run(&programmer, color.or(config.led).unwrap_or_default())
            }
        }
        Commands::Layout => {
            commands::layout::show();
            Ok(())
        }
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
