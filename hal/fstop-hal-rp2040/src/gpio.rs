//! GPIO wrappers
//!
//! Thin newtypes so embassy pins can stand in for the `fstop-hal` pin
//! traits (the latch line of the shift-register display, the encoder and
//! start-switch inputs).

use embassy_rp::gpio::{Input, Output};
use fstop_hal::{InputPin, OutputPin};

/// Push-pull output driving a latch or indicator
pub struct LatchPin<'d>(pub Output<'d>);

impl OutputPin for LatchPin<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }
}

/// Digital input read by level
pub struct InputLine<'d>(pub Input<'d>);

impl InputPin for InputLine<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
