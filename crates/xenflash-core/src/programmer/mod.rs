//! Programmer traits and abstractions
//!
//! This module defines the traits a backend must implement so the engines
//! in [`crate::flash`] can drive a device.

mod traits;

pub use traits::*;
