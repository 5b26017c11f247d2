//! MAX7219 LED display driver (shift-register bus)
//!
//! The MAX7219 takes 16 bit frames over a write-only SPI-like bus: a
//! register address byte then a data byte, MSB first. A rising edge on the
//! LOAD line latches the frame into the addressed register. There is no
//! acknowledgment, so writes cannot fail from the driver's point of view;
//! bad wiring only shows up as wrong segments.
//!
//! The driver runs the chip in Code-B decode mode: digit registers take
//! a value 0-9 (plus a few symbols) rather than raw segment bits.

use core::convert::Infallible;

use fstop_core::render::{render_decimal, Cell, Glyph};
use fstop_core::traits::NumericDisplay;
use fstop_hal::{OutputPin, SpiConfig, SpiWrite};

/// Register addresses
pub mod reg {
    /// No-op, for cascaded chips
    pub const NOOP: u8 = 0x00;
    /// First digit register; digits 0-7 are 0x01-0x08
    pub const DIGIT0: u8 = 0x01;
    /// Per-digit Code-B decode enable mask
    pub const DECODE_MODE: u8 = 0x09;
    /// LED current, 0-15
    pub const INTENSITY: u8 = 0x0A;
    /// Highest scanned digit, 0-7
    pub const SCAN_LIMIT: u8 = 0x0B;
    /// 0 = shutdown, 1 = normal operation
    pub const SHUTDOWN: u8 = 0x0C;
    /// 1 = all segments lit
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Code-B font values
pub mod code {
    /// Minus sign
    pub const NEGATIVE: u8 = 0x0A;
    /// All segments off
    pub const BLANK: u8 = 0x0F;
    /// Decimal point bit, OR'd onto any code
    pub const DECIMAL_POINT: u8 = 0x80;
    /// Decode mode value enabling Code-B on every digit
    pub const DECODE_ALL: u8 = 0xFF;
}

/// Digit registers on the chip
pub const MAX_DIGITS: u8 = 8;

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Max7219Config {
    /// Digits wired to the chip (1-8)
    pub digits: u8,
    /// Intensity 0-15
    pub intensity: u8,
    /// Bus timing
    pub spi: SpiConfig,
}

impl Default for Max7219Config {
    fn default() -> Self {
        Self {
            digits: 4,
            intensity: 4,
            spi: SpiConfig::default(),
        }
    }
}

/// MAX7219 driver
pub struct Max7219<SPI, LOAD> {
    spi: SPI,
    load: LOAD,
    config: Max7219Config,
}

impl<SPI: SpiWrite, LOAD: OutputPin> Max7219<SPI, LOAD> {
    /// Create a driver
    ///
    /// Digit count is clamped to 1-8.
    pub fn new(spi: SPI, load: LOAD, mut config: Max7219Config) -> Self {
        config.digits = config.digits.clamp(1, MAX_DIGITS);
        Self { spi, load, config }
    }

    /// Give the bus and latch pin back
    pub fn release(self) -> (SPI, LOAD) {
        (self.spi, self.load)
    }

    /// Digits in use
    pub fn digits(&self) -> u8 {
        self.config.digits
    }

    /// Set up the bus lines and park the latch high
    pub fn init(&mut self) {
        self.spi.configure(&self.config.spi);
        self.load.set_high();
    }

    /// Start-up register sequence
    ///
    /// Code-B decode on all digits, scan limit to the digits in use,
    /// configured intensity, test mode off, then power on.
    pub fn configure(&mut self) {
        self.set_decode_mode(code::DECODE_ALL);
        self.write_register(reg::SCAN_LIMIT, self.config.digits - 1);
        self.set_intensity(self.config.intensity);
        self.set_test_mode(false);
        self.set_power(true);
    }

    /// Write one register and latch it
    pub fn write_register(&mut self, register: u8, value: u8) {
        self.load.set_low();
        self.spi.write(&[register, value]);
        self.load.set_high();
    }

    /// Decode mode bitmask, one bit per digit
    pub fn set_decode_mode(&mut self, mask: u8) {
        self.write_register(reg::DECODE_MODE, mask);
    }

    /// Intensity 0-15, masked to 4 bits
    pub fn set_intensity(&mut self, intensity: u8) {
        self.write_register(reg::INTENSITY, intensity & 0x0F);
    }

    /// Leave or enter shutdown
    pub fn set_power(&mut self, on: bool) {
        self.write_register(reg::SHUTDOWN, on as u8);
    }

    /// Light every segment regardless of digit registers
    pub fn set_test_mode(&mut self, on: bool) {
        self.write_register(reg::DISPLAY_TEST, on as u8);
    }

    /// Blank every digit in use
    pub fn clear_display(&mut self) {
        for digit in 0..self.config.digits {
            self.write_register(reg::DIGIT0 + digit, code::BLANK);
        }
    }

    /// Show a signed integer, right-aligned
    ///
    /// Digits that do not fit are dropped from the most significant end.
    pub fn display_number(&mut self, value: i32) {
        self.display_fixed(value, 0);
    }

    /// Show `value / 10^decimals` with the decimal point lit
    pub fn display_fixed(&mut self, value: i32, decimals: u8) {
        let cells = render_decimal(value, decimals, self.config.digits as usize);
        for (digit, cell) in cells.iter().enumerate() {
            self.write_register(reg::DIGIT0 + digit as u8, code_b(cell));
        }
    }
}

/// Code-B value for a cell
fn code_b(cell: &Cell) -> u8 {
    let value = match cell.glyph {
        Glyph::Blank => code::BLANK,
        Glyph::Minus => code::NEGATIVE,
        Glyph::Digit(d) => d,
    };
    if cell.point {
        value | code::DECIMAL_POINT
    } else {
        value
    }
}

impl<SPI: SpiWrite, LOAD: OutputPin> NumericDisplay for Max7219<SPI, LOAD> {
    type Error = Infallible;

    fn digit_count(&self) -> usize {
        self.config.digits as usize
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.clear_display();
        Ok(())
    }

    fn show_fixed(&mut self, value: i32, decimals: u8) -> Result<(), Infallible> {
        self.display_fixed(value, decimals);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Line {
        Configure(SpiConfig),
        Shift(u8),
        Load(bool),
    }

    type Trace = Rc<RefCell<Vec<Line>>>;

    struct MockSpi(Trace);
    struct MockLoad(Trace);

    impl SpiWrite for MockSpi {
        fn configure(&mut self, config: &SpiConfig) {
            self.0.borrow_mut().push(Line::Configure(*config));
        }

        fn write(&mut self, data: &[u8]) {
            let mut trace = self.0.borrow_mut();
            for &byte in data {
                trace.push(Line::Shift(byte));
            }
        }
    }

    impl OutputPin for MockLoad {
        fn set_high(&mut self) {
            self.0.borrow_mut().push(Line::Load(true));
        }

        fn set_low(&mut self) {
            self.0.borrow_mut().push(Line::Load(false));
        }
    }

    /// Register writes committed by a rising LOAD edge, in order
    fn latched(trace: &Trace) -> Vec<(u8, u8)> {
        let mut writes = Vec::new();
        let mut shifted: Vec<u8> = Vec::new();
        let mut load = true;
        for line in trace.borrow().iter() {
            match *line {
                Line::Shift(byte) => shifted.push(byte),
                Line::Load(true) if !load => {
                    // Chip keeps the last 16 bits shifted in
                    if shifted.len() >= 2 {
                        let n = shifted.len();
                        writes.push((shifted[n - 2], shifted[n - 1]));
                    }
                    shifted.clear();
                    load = true;
                }
                Line::Load(level) => load = level,
                Line::Configure(_) => {}
            }
        }
        writes
    }

    /// Register file after replaying the latched writes
    fn registers(trace: &Trace) -> [u8; 16] {
        let mut regs = [0u8; 16];
        for (reg, value) in latched(trace) {
            regs[(reg & 0x0F) as usize] = value;
        }
        regs
    }

    fn driver(digits: u8) -> (Max7219<MockSpi, MockLoad>, Trace) {
        let trace: Trace = Rc::new(RefCell::new(Vec::new()));
        let config = Max7219Config {
            digits,
            ..Default::default()
        };
        let drv = Max7219::new(MockSpi(trace.clone()), MockLoad(trace.clone()), config);
        (drv, trace)
    }

    fn digit_registers(trace: &Trace, digits: usize) -> Vec<u8> {
        registers(trace)[1..=digits].to_vec()
    }

    #[test]
    fn test_init_configures_lines() {
        let (mut drv, trace) = driver(4);
        drv.init();
        assert_eq!(
            *trace.borrow(),
            vec![Line::Configure(SpiConfig::default()), Line::Load(true)]
        );
    }

    #[test]
    fn test_write_register_frame() {
        let (mut drv, trace) = driver(4);
        drv.write_register(reg::INTENSITY, 7);
        assert_eq!(
            *trace.borrow(),
            vec![
                Line::Load(false),
                Line::Shift(0x0A),
                Line::Shift(7),
                Line::Load(true)
            ]
        );
    }

    #[test]
    fn test_configure_sequence() {
        let (mut drv, trace) = driver(4);
        drv.configure();
        assert_eq!(
            latched(&trace),
            vec![
                (reg::DECODE_MODE, 0xFF),
                (reg::SCAN_LIMIT, 3),
                (reg::INTENSITY, 4),
                (reg::DISPLAY_TEST, 0),
                (reg::SHUTDOWN, 1),
            ]
        );
    }

    #[test]
    fn test_clear_blanks_digits_in_use() {
        let (mut drv, trace) = driver(4);
        drv.clear_display();
        assert_eq!(
            latched(&trace),
            vec![(1, 0x0F), (2, 0x0F), (3, 0x0F), (4, 0x0F)]
        );
    }

    #[test]
    fn test_display_zero() {
        let (mut drv, trace) = driver(4);
        drv.display_number(0);
        assert_eq!(digit_registers(&trace, 4), vec![0, 0x0F, 0x0F, 0x0F]);
    }

    #[test]
    fn test_display_negative() {
        let (mut drv, trace) = driver(4);
        drv.display_number(-5);
        assert_eq!(digit_registers(&trace, 4), vec![5, 0x0A, 0x0F, 0x0F]);
    }

    #[test]
    fn test_display_number_digits() {
        let (mut drv, trace) = driver(4);
        drv.display_number(907);
        assert_eq!(digit_registers(&trace, 4), vec![7, 0, 9, 0x0F]);
    }

    #[test]
    fn test_overflow_truncates_to_low_digits() {
        let (mut drv, trace) = driver(4);
        drv.display_number(123_456);
        assert_eq!(digit_registers(&trace, 4), vec![6, 5, 4, 3]);
        // Nothing written past the digits in use
        assert!(latched(&trace).iter().all(|(reg, _)| *reg <= 4));
    }

    #[test]
    fn test_negative_overflow_drops_sign() {
        let (mut drv, trace) = driver(4);
        drv.display_number(-4321);
        assert_eq!(digit_registers(&trace, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_display_fixed_point() {
        let (mut drv, trace) = driver(4);
        drv.display_fixed(50, 1);
        assert_eq!(digit_registers(&trace, 4), vec![0, 0x85, 0x0F, 0x0F]);
    }

    #[test]
    fn test_digits_clamped() {
        let (drv, _) = driver(0);
        assert_eq!(drv.digits(), 1);
        let (drv, _) = driver(12);
        assert_eq!(drv.digits(), 8);
    }

    #[test]
    fn test_intensity_masked() {
        let (mut drv, trace) = driver(4);
        drv.set_intensity(0x1F);
        assert_eq!(latched(&trace), vec![(reg::INTENSITY, 0x0F)]);
    }

    #[test]
    fn test_numeric_display_trait() {
        let (mut drv, trace) = driver(4);
        assert_eq!(drv.digit_count(), 4);
        drv.show_number(42).unwrap();
        assert_eq!(digit_registers(&trace, 4), vec![2, 4, 0x0F, 0x0F]);
        drv.clear().unwrap();
        assert_eq!(digit_registers(&trace, 4), vec![0x0F; 4]);
    }
}
