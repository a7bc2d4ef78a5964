//! LED command

use std::thread;
use std::time::Duration;
use xenflash_core::led::Led;

use super::{with_device, CommandResult};

/// How long each colour stays lit while cycling
const CYCLE_STEP: Duration = Duration::from_millis(250);

/// Set the status LED
pub fn run(programmer: &str, led: Led) -> CommandResult {
    with_device(programmer, |selector| {
        selector.set_led(led)?;
        println!("LED: {}", led);
        Ok(())
    })
}

/// Show every colour in register order, then switch the LED off
pub fn cycle(programmer: &str) -> CommandResult {
    with_device(programmer, |selector| {
        let mut led = Led::Off.next();
        loop {
            selector.set_led(led)?;
            println!("LED: {}", led);
            if led == Led::Off {
                return Ok(());
            }
            thread::sleep(CYCLE_STEP);
            led = led.next();
        }
    })
}
