//! Display driver implementations
//!
//! This crate provides the display drivers behind the
//! [`fstop_core::traits::NumericDisplay`] trait:
//!
//! - TM1637 6 digit controller over a bit-banged two-wire bus
//! - MAX7219 LED driver over a shift-register (SPI-like) bus
//! - Hex to 7-segment encoding for the TM1637
//! - Generic `embedded-hal` pin bindings for both buses

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bitbang;
pub mod max7219;
pub mod segment;
pub mod tm1637;

pub use max7219::{Max7219, Max7219Config};
pub use segment::SegmentPattern;
pub use tm1637::{Tm1637, Tm1637Error};
