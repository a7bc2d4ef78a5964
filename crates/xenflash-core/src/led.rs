//! Status LED colours

use core::fmt;
use core::str::FromStr;

/// Colours understood by the LED register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Led {
    /// LED off
    #[default]
    Off = 0,
    /// Red
    Red = 1,
    /// Green
    Green = 2,
    /// Red and green
    Amber = 3,
    /// Blue
    Blue = 4,
    /// Red and blue
    Purple = 5,
    /// Green and blue
    Teal = 6,
    /// All three
    White = 7,
}

/// All colours in register order
pub const ALL_LEDS: [Led; 8] = [
    Led::Off,
    Led::Red,
    Led::Green,
    Led::Amber,
    Led::Blue,
    Led::Purple,
    Led::Teal,
    Led::White,
];

impl Led {
    /// Raw LED register value
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Upper-case name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Amber => "AMBER",
            Self::Blue => "BLUE",
            Self::Purple => "PURPLE",
            Self::Teal => "TEAL",
            Self::White => "WHITE",
        }
    }

    /// Next colour, wrapping from white back to off
    pub const fn next(self) -> Self {
        ALL_LEDS[(self as usize + 1) % ALL_LEDS.len()]
    }
}

impl fmt::Display for Led {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Led {
    type Err = &'static str;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        ALL_LEDS
            .iter()
            .copied()
            .find(|led| led.name().eq_ignore_ascii_case(s))
            .ok_or("unknown LED colour")
    }
}
