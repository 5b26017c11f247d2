//! Transmit-only SPI for the shift-register display
//!
//! Wraps a blocking embassy SPI peripheral. The RP2040 SPI block only
//! shifts MSB first, so LSB-first writes are bit-reversed in software.

use embassy_rp::spi::{Blocking, Config, Instance, Phase, Polarity, Spi};
use fstop_hal::spi::{self, BitOrder};
use fstop_hal::{SpiConfig, SpiWrite};

/// [`SpiWrite`] over a blocking embassy SPI peripheral
pub struct BlockingSpiOut<'d, T: Instance> {
    spi: Spi<'d, T, Blocking>,
    bit_order: BitOrder,
}

impl<'d, T: Instance> BlockingSpiOut<'d, T> {
    /// Wrap a peripheral created with `Spi::new_blocking_txonly`
    pub fn new(spi: Spi<'d, T, Blocking>) -> Self {
        Self {
            spi,
            bit_order: BitOrder::MsbFirst,
        }
    }

    fn send(&mut self, data: &[u8]) {
        if let Err(_e) = self.spi.blocking_write(data) {
            #[cfg(feature = "defmt")]
            defmt::warn!("SPI write failed: {:?}", _e);
        }
    }
}

impl<T: Instance> SpiWrite for BlockingSpiOut<'_, T> {
    fn configure(&mut self, config: &SpiConfig) {
        let (polarity, phase): (spi::Polarity, spi::Phase) = config.mode.into();

        let mut hw = Config::default();
        hw.frequency = config.frequency;
        hw.polarity = match polarity {
            spi::Polarity::IdleLow => Polarity::IdleLow,
            spi::Polarity::IdleHigh => Polarity::IdleHigh,
        };
        hw.phase = match phase {
            spi::Phase::CaptureOnFirstTransition => Phase::CaptureOnFirstTransition,
            spi::Phase::CaptureOnSecondTransition => Phase::CaptureOnSecondTransition,
        };

        self.spi.set_config(&hw);
        self.bit_order = config.bit_order;
    }

    fn write(&mut self, data: &[u8]) {
        match self.bit_order {
            BitOrder::MsbFirst => self.send(data),
            BitOrder::LsbFirst => {
                for &byte in data {
                    self.send(&[byte.reverse_bits()]);
                }
            }
        }
    }
}
