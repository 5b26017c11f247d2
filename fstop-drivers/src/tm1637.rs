//! TM1637 display controller (bit-banged two-wire bus)
//!
//! The TM1637 drives up to six 7-segment digits. It talks over a clocked,
//! half-duplex two-wire bus that looks like I2C without addresses or
//! arbitration:
//!
//! - START: data falls while clock is high
//! - Bytes: 8 bits LSB first, data changes while clock is low
//! - ACK: after the 8th bit the chip pulls data low for one clock
//! - STOP: data rises while clock is high
//!
//! # Commands
//!
//! | byte          | meaning                                      |
//! |---------------|----------------------------------------------|
//! | `0x40`        | data setting: write display, auto-increment  |
//! | `0xC0 \| a`   | address setting: first digit register `a`    |
//! | `0x80 \| ...` | display control: on flag + 3 bit brightness  |
//!
//! # Concurrency
//!
//! A digit update is two frames. Nothing stops an interrupt from driving
//! the same lines between them; callers that share the pins with an ISR
//! must mask it for the duration of the call.

use fstop_core::render::{render_decimal, Glyph};
use fstop_core::traits::NumericDisplay;
use fstop_hal::PlatformBinding;

use crate::segment::{self, SegmentPattern};

/// Digit registers on the chip
pub const MAX_DIGITS: u8 = 6;

/// Settle time between line transitions
pub const BIT_DELAY_US: u32 = 5;

/// Command bytes
pub mod cmd {
    /// Data setting command
    pub const DATA_SETTING: u8 = 0x40;
    /// Display control command
    pub const DISPLAY_CONTROL: u8 = 0x80;
    /// Address setting command
    pub const ADDRESS_SETTING: u8 = 0xC0;

    /// Data setting: write to display registers
    pub const WRITE_DISPLAY: u8 = 0x00;
    /// Data setting: address increments after each byte
    pub const AUTO_INCREMENT: u8 = 0x00;
    /// Data setting: normal mode
    pub const NORMAL_MODE: u8 = 0x00;

    /// Display control: display on
    pub const DISPLAY_ON: u8 = 0x08;
    /// Display control: brightness bits
    pub const BRIGHTNESS_MASK: u8 = 0x07;
}

/// TM1637 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tm1637Error {
    /// Start address at or beyond the last digit; nothing was sent
    InvalidAddress,
    /// A byte was not acknowledged; the frame was abandoned and the chip
    /// state is undefined until the command is re-issued
    AckFailure,
}

/// Display control settings
///
/// Not cached by the driver: each [`Tm1637::configure_display`] sends the
/// full control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Pulse width step 0-7 (1/16 up to 14/16), masked to 3 bits
    pub brightness: u8,
    /// Display on
    pub on: bool,
}

impl DisplayConfig {
    /// Display control command byte
    pub const fn control_byte(&self) -> u8 {
        let on = if self.on { cmd::DISPLAY_ON } else { 0 };
        cmd::DISPLAY_CONTROL | (self.brightness & cmd::BRIGHTNESS_MASK) | on
    }
}

/// TM1637 driver
///
/// Owns its binding; pass `&mut binding` to keep ownership with the caller.
pub struct Tm1637<B> {
    bus: B,
}

impl<B: PlatformBinding> Tm1637<B> {
    /// Create a driver on the given bus
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    /// Run the platform init hook
    pub fn init(&mut self) -> Result<(), Tm1637Error> {
        self.bus.init();
        Ok(())
    }

    /// Run the platform deinit hook
    pub fn deinit(&mut self) -> Result<(), Tm1637Error> {
        self.bus.deinit();
        Ok(())
    }

    /// Set brightness and on/off state
    ///
    /// Always succeeds; a missing acknowledgment is only logged.
    pub fn configure_display(&mut self, brightness: u8, on: bool) -> Result<(), Tm1637Error> {
        let config = DisplayConfig { brightness, on };

        self.start();
        let result = self.write_bytes(&[config.control_byte()]);
        self.stop();

        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("TM1637: display control not acknowledged");
        }
        Ok(())
    }

    /// Write one digit register
    pub fn set_digit(&mut self, pattern: SegmentPattern, address: u8) -> Result<(), Tm1637Error> {
        self.set_digits(&[pattern], address, 1)
    }

    /// Write consecutive digit registers starting at `start`
    ///
    /// `count` is clamped to the patterns given and to the digits left
    /// after `start`.
    pub fn set_digits(
        &mut self,
        patterns: &[SegmentPattern],
        start: u8,
        count: usize,
    ) -> Result<(), Tm1637Error> {
        if start >= MAX_DIGITS {
            return Err(Tm1637Error::InvalidAddress);
        }

        let count = count
            .min(patterns.len())
            .min((MAX_DIGITS - start) as usize);

        let mut data = [0u8; MAX_DIGITS as usize];
        for (byte, pattern) in data.iter_mut().zip(&patterns[..count]) {
            *byte = pattern.bits();
        }

        // Frame 1: data setting
        self.start();
        let result = self.write_bytes(&[cmd::DATA_SETTING
            | cmd::WRITE_DISPLAY
            | cmd::AUTO_INCREMENT
            | cmd::NORMAL_MODE]);
        self.stop();
        result?;

        // Frame 2: address + digits
        self.start();
        let result = self
            .write_bytes(&[cmd::ADDRESS_SETTING | start])
            .and_then(|()| self.write_bytes(&data[..count]));
        self.stop();
        result
    }

    /// Encode a hex value and write it to one digit
    ///
    /// `value` is 0-15 or an ASCII hex letter; anything else blanks the
    /// digit.
    pub fn set_digit_from_hex(
        &mut self,
        value: u8,
        decimal_point: bool,
        address: u8,
    ) -> Result<(), Tm1637Error> {
        self.set_digit(segment::encode(value, decimal_point), address)
    }

    fn start(&mut self) {
        self.bus.configure_output();
        self.bus.write_data(true);
        self.bus.write_clock(true);
        self.bus.delay_us(BIT_DELAY_US);
        self.bus.write_data(false);
    }

    fn stop(&mut self) {
        self.bus.configure_output();

        self.bus.write_clock(false);
        self.bus.write_data(false);
        self.bus.delay_us(BIT_DELAY_US);

        self.bus.write_clock(true);
        self.bus.delay_us(BIT_DELAY_US);

        self.bus.write_data(true);
    }

    /// Clock out bytes, stopping at the first one the chip does not ack
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Tm1637Error> {
        let mut result = Ok(());

        for &byte in data {
            self.bus.configure_output();

            let mut bits = byte;
            for _ in 0..8 {
                self.bus.write_clock(false);
                self.bus.write_data(bits & 0x01 != 0);
                self.bus.delay_us(BIT_DELAY_US);
                self.bus.write_clock(true);
                self.bus.delay_us(BIT_DELAY_US);
                bits >>= 1;
            }

            // 9th clock: chip pulls data low to acknowledge
            self.bus.write_clock(false);
            self.bus.configure_input();
            self.bus.delay_us(BIT_DELAY_US);
            let nack = self.bus.read_data();
            self.bus.write_clock(true);
            self.bus.delay_us(BIT_DELAY_US);
            self.bus.write_clock(false);

            if nack {
                #[cfg(feature = "defmt")]
                defmt::debug!("TM1637: no ack for {=u8:#x}", byte);
                result = Err(Tm1637Error::AckFailure);
                break;
            }
        }

        self.bus.delay_us(BIT_DELAY_US);
        result
    }
}

impl<B: PlatformBinding> NumericDisplay for Tm1637<B> {
    type Error = Tm1637Error;

    fn digit_count(&self) -> usize {
        MAX_DIGITS as usize
    }

    fn clear(&mut self) -> Result<(), Tm1637Error> {
        let blank = [SegmentPattern::BLANK; MAX_DIGITS as usize];
        self.set_digits(&blank, 0, blank.len())
    }

    fn show_fixed(&mut self, value: i32, decimals: u8) -> Result<(), Tm1637Error> {
        let cells = render_decimal(value, decimals, MAX_DIGITS as usize);

        // Address 0 is the leftmost digit, cell 0 the rightmost
        let mut patterns = [SegmentPattern::BLANK; MAX_DIGITS as usize];
        for (slot, cell) in patterns.iter_mut().rev().zip(cells.iter()) {
            let pattern = match cell.glyph {
                Glyph::Blank => SegmentPattern::BLANK,
                Glyph::Minus => SegmentPattern::MINUS,
                Glyph::Digit(d) => segment::encode_digit(d),
            };
            *slot = if cell.point {
                pattern.with_decimal_point()
            } else {
                pattern
            };
        }

        self.set_digits(&patterns, 0, patterns.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Init,
        Deinit,
        Output,
        Input,
        Data(bool),
        Clock(bool),
        Delay(u32),
        Read,
    }

    /// In-memory bus that records every line operation
    ///
    /// Reads return low (acknowledged) except for the read numbered
    /// `nack_at`, counting from zero.
    #[derive(Default)]
    struct BusRecorder {
        ops: Vec<Op>,
        reads: usize,
        nack_at: Option<usize>,
    }

    impl BusRecorder {
        fn nack_at(read: usize) -> Self {
            Self {
                nack_at: Some(read),
                ..Default::default()
            }
        }

        /// Decode the recorded transitions into frames of bytes
        fn frames(&self) -> Vec<Vec<u8>> {
            let mut frames = Vec::new();
            let mut current: Option<Vec<u8>> = None;
            let (mut clk, mut dio, mut output) = (false, false, true);
            let (mut byte, mut nbits) = (0u8, 0u8);

            for op in &self.ops {
                match *op {
                    Op::Output => output = true,
                    Op::Input => {
                        output = false;
                        dio = true;
                    }
                    Op::Data(level) if output => {
                        if clk && dio && !level {
                            current = Some(Vec::new());
                            byte = 0;
                            nbits = 0;
                        } else if clk && !dio && level {
                            // The stop condition's own clock edge leaves a stray bit
                            if let Some(frame) = current.take() {
                                frames.push(frame);
                            }
                        }
                        dio = level;
                    }
                    Op::Clock(level) => {
                        if level && !clk && output {
                            if let Some(frame) = current.as_mut() {
                                byte |= (dio as u8) << nbits;
                                nbits += 1;
                                if nbits == 8 {
                                    frame.push(byte);
                                    byte = 0;
                                    nbits = 0;
                                }
                            }
                        }
                        if level && !clk && !output {
                            // ack clock
                            byte = 0;
                            nbits = 0;
                        }
                        clk = level;
                    }
                    _ => {}
                }
            }
            frames
        }

        fn delays(&self) -> impl Iterator<Item = u32> + '_ {
            self.ops.iter().filter_map(|op| match op {
                Op::Delay(us) => Some(*us),
                _ => None,
            })
        }
    }

    impl PlatformBinding for BusRecorder {
        fn init(&mut self) {
            self.ops.push(Op::Init);
        }

        fn deinit(&mut self) {
            self.ops.push(Op::Deinit);
        }

        fn configure_output(&mut self) {
            self.ops.push(Op::Output);
        }

        fn configure_input(&mut self) {
            self.ops.push(Op::Input);
        }

        fn write_data(&mut self, high: bool) {
            self.ops.push(Op::Data(high));
        }

        fn read_data(&mut self) -> bool {
            self.ops.push(Op::Read);
            let nack = self.nack_at == Some(self.reads);
            self.reads += 1;
            nack
        }

        fn write_clock(&mut self, high: bool) {
            self.ops.push(Op::Clock(high));
        }

        fn delay_us(&mut self, us: u32) {
            self.ops.push(Op::Delay(us));
        }
    }

    fn digits(n: usize) -> Vec<SegmentPattern> {
        (0..n as u8).map(|d| segment::encode(d, false)).collect()
    }

    #[test]
    fn test_configure_display_single_frame() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);

        assert_eq!(tm.configure_display(4, true), Ok(()));
        assert_eq!(bus.frames(), vec![vec![0x8C]]);
    }

    #[test]
    fn test_control_byte() {
        let off = DisplayConfig {
            brightness: 7,
            on: false,
        };
        assert_eq!(off.control_byte(), 0x87);

        // Brightness above 7 is masked
        let masked = DisplayConfig {
            brightness: 0x0F,
            on: true,
        };
        assert_eq!(masked.control_byte(), 0x8F);
    }

    #[test]
    fn test_configure_display_ignores_nack() {
        let mut bus = BusRecorder::nack_at(0);
        let mut tm = Tm1637::new(&mut bus);

        assert_eq!(tm.configure_display(0, false), Ok(()));
        assert_eq!(bus.frames(), vec![vec![0x80]]);
    }

    #[test]
    fn test_set_digit_frames() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);

        tm.set_digit(SegmentPattern(0x3F), 2).unwrap();
        assert_eq!(bus.frames(), vec![vec![0x40], vec![0xC2, 0x3F]]);
        assert_eq!(bus.reads, 3);
    }

    #[test]
    fn test_set_digit_from_hex() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);

        tm.set_digit_from_hex(b'b', true, 0).unwrap();
        tm.set_digit_from_hex(b'z', true, 5).unwrap();

        let frames = bus.frames();
        assert_eq!(frames[1], vec![0xC0, 0xFC]);
        assert_eq!(frames[3], vec![0xC5, 0x00]);
    }

    #[test]
    fn test_invalid_address_sends_nothing() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);

        assert_eq!(
            tm.set_digits(&digits(6), MAX_DIGITS, 1),
            Err(Tm1637Error::InvalidAddress)
        );
        assert_eq!(
            tm.set_digit(SegmentPattern::BLANK, 200),
            Err(Tm1637Error::InvalidAddress)
        );
        assert!(bus.ops.is_empty());
    }

    #[test]
    fn test_count_clamped_to_capacity() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);

        tm.set_digits(&digits(6), 4, 6).unwrap();
        let frames = bus.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], vec![0xC4, 0x3F, 0x06]);
    }

    #[test]
    fn test_count_clamped_to_patterns() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);

        tm.set_digits(&digits(2), 0, 6).unwrap();
        assert_eq!(bus.frames()[1].len(), 3);
    }

    #[test]
    fn test_nack_on_data_command_skips_second_frame() {
        let mut bus = BusRecorder::nack_at(0);
        let mut tm = Tm1637::new(&mut bus);

        assert_eq!(
            tm.set_digits(&digits(6), 0, 6),
            Err(Tm1637Error::AckFailure)
        );
        assert_eq!(bus.frames(), vec![vec![0x40]]);
        assert_eq!(bus.reads, 1);
    }

    #[test]
    fn test_nack_on_address_command() {
        let mut bus = BusRecorder::nack_at(1);
        let mut tm = Tm1637::new(&mut bus);

        assert_eq!(
            tm.set_digits(&digits(6), 1, 3),
            Err(Tm1637Error::AckFailure)
        );
        assert_eq!(bus.frames(), vec![vec![0x40], vec![0xC1]]);
        assert_eq!(bus.reads, 2);
    }

    #[test]
    fn test_nack_mid_burst_stops_sending() {
        // reads: data cmd, address cmd, digit 0, digit 1 (nack)
        let mut bus = BusRecorder::nack_at(3);
        let mut tm = Tm1637::new(&mut bus);

        assert_eq!(
            tm.set_digits(&digits(6), 0, 6),
            Err(Tm1637Error::AckFailure)
        );
        assert_eq!(bus.frames()[1], vec![0xC0, 0x3F, 0x06]);
        assert_eq!(bus.reads, 4);
    }

    #[test]
    fn test_lsb_first() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);
        tm.configure_display(1, false).unwrap(); // 0x81

        // Skip the start condition's two data writes
        let bits: Vec<bool> = bus
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Data(level) => Some(*level),
                _ => None,
            })
            .skip(2)
            .take(8)
            .collect();
        assert_eq!(
            bits,
            vec![true, false, false, false, false, false, false, true]
        );
    }

    #[test]
    fn test_ack_read_with_line_released() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);
        tm.configure_display(3, true).unwrap();

        let read = bus.ops.iter().position(|op| *op == Op::Read).unwrap();
        let input = bus.ops.iter().position(|op| *op == Op::Input).unwrap();
        assert!(input < read);
        assert_eq!(bus.ops[input - 1], Op::Clock(false));
    }

    #[test]
    fn test_fixed_delays() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);
        tm.set_digits(&digits(6), 0, 6).unwrap();

        assert!(bus.delays().count() > 0);
        assert!(bus.delays().all(|us| us == BIT_DELAY_US));
    }

    #[test]
    fn test_lifecycle_hooks() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);
        assert_eq!(tm.init(), Ok(()));
        assert_eq!(tm.deinit(), Ok(()));
        assert_eq!(bus.ops, vec![Op::Init, Op::Deinit]);
    }

    #[test]
    fn test_show_negative_number() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);
        tm.show_number(-5).unwrap();

        assert_eq!(
            bus.frames()[1],
            vec![0xC0, 0x00, 0x00, 0x00, 0x00, 0x40, 0x6D]
        );
    }

    #[test]
    fn test_show_tenths() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);
        tm.show_fixed(5, 1).unwrap();

        // "0.5"
        assert_eq!(
            bus.frames()[1],
            vec![0xC0, 0x00, 0x00, 0x00, 0x00, 0xBF, 0x6D]
        );
    }

    #[test]
    fn test_clear() {
        let mut bus = BusRecorder::default();
        let mut tm = Tm1637::new(&mut bus);
        tm.clear().unwrap();
        assert_eq!(bus.frames()[1], vec![0xC0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_release_returns_bus() {
        let tm = Tm1637::new(BusRecorder::nack_at(7));
        let bus = tm.release();
        assert_eq!(bus.nack_at, Some(7));
    }

    proptest! {
        #[test]
        fn prop_two_frames_with_clamped_count(start in 0u8..MAX_DIGITS, count in 0usize..=8) {
            let mut bus = BusRecorder::default();
            let mut tm = Tm1637::new(&mut bus);
            prop_assert_eq!(tm.set_digits(&digits(6), start, count), Ok(()));

            let expected = count.min((MAX_DIGITS - start) as usize);
            let frames = bus.frames();
            prop_assert_eq!(frames.len(), 2);
            prop_assert_eq!(frames[0].clone(), vec![0x40]);
            prop_assert_eq!(frames[1].len(), 1 + expected);
            prop_assert_eq!(frames[1][0], 0xC0 | start);
        }

        #[test]
        fn prop_out_of_range_is_silent(start in MAX_DIGITS..=u8::MAX) {
            let mut bus = BusRecorder::default();
            let mut tm = Tm1637::new(&mut bus);
            prop_assert_eq!(tm.set_digits(&digits(6), start, 1), Err(Tm1637Error::InvalidAddress));
            prop_assert!(bus.ops.is_empty());
        }
    }
}
