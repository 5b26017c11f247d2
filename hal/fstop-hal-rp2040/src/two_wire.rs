//! Two-wire display bus
//!
//! The clock is a plain output. The data pin is a [`Flex`] so it can be
//! switched to input (with the pull-up holding it high) while the display
//! drives its acknowledgment bit.

use embassy_rp::gpio::{Flex, Level, Output, Pull};
use embassy_time::{block_for, Duration};
use fstop_hal::PlatformBinding;

/// [`PlatformBinding`] over an RP2040 output pin and a flexible data pin
pub struct FlexTwoWire<'d> {
    clk: Output<'d>,
    dio: Flex<'d>,
}

impl<'d> FlexTwoWire<'d> {
    /// Build the bus from an already created clock output and data pin
    pub fn new(clk: Output<'d>, mut dio: Flex<'d>) -> Self {
        dio.set_pull(Pull::Up);
        Self { clk, dio }
    }
}

impl PlatformBinding for FlexTwoWire<'_> {
    fn init(&mut self) {
        self.clk.set_high();
        self.dio.set_high();
        self.dio.set_as_output();
    }

    fn deinit(&mut self) {
        self.dio.set_as_input();
    }

    fn configure_output(&mut self) {
        self.dio.set_as_output();
    }

    fn configure_input(&mut self) {
        self.dio.set_as_input();
    }

    fn write_data(&mut self, high: bool) {
        self.dio.set_level(Level::from(high));
    }

    fn read_data(&mut self) -> bool {
        self.dio.is_high()
    }

    fn write_clock(&mut self, high: bool) {
        self.clk.set_level(Level::from(high));
    }

    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }
}
