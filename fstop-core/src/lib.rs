//! Board-agnostic core logic for the exposure timer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Numeric display trait shared by the display drivers
//! - Decimal layout for multi-digit displays
//! - Rotary encoder decoding
//! - Countdown sequencing and f-stop exposure maths
//! - Timer application state machine
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod app;
pub mod config;
pub mod countdown;
pub mod exposure;
pub mod render;
pub mod rotary;
pub mod traits;
