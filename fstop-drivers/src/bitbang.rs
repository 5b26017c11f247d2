//! Bit-banged buses over embedded-hal pins
//!
//! Board-agnostic implementations of the fstop-hal bus traits for any pins
//! and delay provider that implement the embedded-hal 1.0 traits. Pin
//! errors are dropped: the display protocols have no way to report them,
//! and the GPIO of every supported board is infallible anyway.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin as HalInputPin, OutputPin as HalOutputPin};
use fstop_hal::spi::{BitOrder, Phase, Polarity};
use fstop_hal::{OutputPin, PlatformBinding, SpiConfig, SpiWrite};

/// Two-wire bus on an open-drain data pin
///
/// The data pin must be wired open-drain with a pull-up, so "input mode"
/// is simply releasing the line high and reading it back. The clock is a
/// plain push-pull output.
pub struct OpenDrainTwoWire<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
}

impl<CLK, DIO, D> OpenDrainTwoWire<CLK, DIO, D>
where
    CLK: HalOutputPin,
    DIO: HalOutputPin + HalInputPin,
    D: DelayNs,
{
    pub fn new(clk: CLK, dio: DIO, delay: D) -> Self {
        Self { clk, dio, delay }
    }

    pub fn release(self) -> (CLK, DIO, D) {
        (self.clk, self.dio, self.delay)
    }
}

impl<CLK, DIO, D> PlatformBinding for OpenDrainTwoWire<CLK, DIO, D>
where
    CLK: HalOutputPin,
    DIO: HalOutputPin + HalInputPin,
    D: DelayNs,
{
    fn init(&mut self) {
        // Both lines idle high
        let _ = self.clk.set_high();
        let _ = self.dio.set_high();
    }

    fn configure_output(&mut self) {}

    fn configure_input(&mut self) {
        let _ = self.dio.set_high();
    }

    fn write_data(&mut self, high: bool) {
        let _ = self.dio.set_state(high.into());
    }

    fn read_data(&mut self) -> bool {
        // A failed read counts as no acknowledgment
        self.dio.is_high().unwrap_or(true)
    }

    fn write_clock(&mut self, high: bool) {
        let _ = self.clk.set_state(high.into());
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

/// Write-only SPI master on two GPIOs
pub struct BitBangSpi<CLK, MOSI, D> {
    clk: CLK,
    mosi: MOSI,
    delay: D,
    config: SpiConfig,
}

impl<CLK, MOSI, D> BitBangSpi<CLK, MOSI, D>
where
    CLK: HalOutputPin,
    MOSI: HalOutputPin,
    D: DelayNs,
{
    pub fn new(clk: CLK, mosi: MOSI, delay: D) -> Self {
        Self {
            clk,
            mosi,
            delay,
            config: SpiConfig::default(),
        }
    }

    pub fn release(self) -> (CLK, MOSI, D) {
        (self.clk, self.mosi, self.delay)
    }

    fn set_clock(&mut self, high: bool) {
        let _ = self.clk.set_state(high.into());
    }

    fn write_byte(&mut self, byte: u8) {
        let (polarity, phase): (Polarity, Phase) = self.config.mode.into();
        let idle = polarity == Polarity::IdleHigh;
        let half = self.config.half_period_us();

        for i in 0..8 {
            let bit = match self.config.bit_order {
                BitOrder::MsbFirst => byte & (0x80 >> i) != 0,
                BitOrder::LsbFirst => byte & (1 << i) != 0,
            };

            match phase {
                Phase::CaptureOnFirstTransition => {
                    let _ = self.mosi.set_state(bit.into());
                    self.delay.delay_us(half);
                    self.set_clock(!idle);
                    self.delay.delay_us(half);
                    self.set_clock(idle);
                }
                Phase::CaptureOnSecondTransition => {
                    self.set_clock(!idle);
                    let _ = self.mosi.set_state(bit.into());
                    self.delay.delay_us(half);
                    self.set_clock(idle);
                    self.delay.delay_us(half);
                }
            }
        }
    }
}

impl<CLK, MOSI, D> SpiWrite for BitBangSpi<CLK, MOSI, D>
where
    CLK: HalOutputPin,
    MOSI: HalOutputPin,
    D: DelayNs,
{
    fn configure(&mut self, config: &SpiConfig) {
        self.config = *config;
        let (polarity, _): (Polarity, Phase) = config.mode.into();
        self.set_clock(polarity == Polarity::IdleHigh);
        let _ = self.mosi.set_low();
    }

    fn write(&mut self, data: &[u8]) {
        for &byte in data {
            self.write_byte(byte);
        }
    }
}

/// fstop-hal output over an embedded-hal pin
pub struct HalPin<P>(pub P);

impl<P: HalOutputPin> OutputPin for HalPin<P> {
    fn set_high(&mut self) {
        let _ = self.0.set_high();
    }

    fn set_low(&mut self) {
        let _ = self.0.set_low();
    }
}
