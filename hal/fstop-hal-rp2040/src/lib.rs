//! RP2040-specific HAL for the exposure timer
//!
//! Implementations of the shared `fstop-hal` traits on top of `embassy-rp`:
//!
//! - Two-wire display bus on a flexible data pin (`two_wire`)
//! - Blocking transmit-only SPI for the shift-register display (`spi`)
//! - Latch and indicator outputs (`gpio`)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;
pub mod two_wire;

pub use gpio::{InputLine, LatchPin};
pub use spi::BlockingSpiOut;
pub use two_wire::FlexTwoWire;

// Re-export shared traits from fstop-hal for convenience
pub use fstop_hal::{InputPin, OutputPin, PlatformBinding, SpiConfig, SpiWrite};
