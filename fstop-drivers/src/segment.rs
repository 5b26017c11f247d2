//! 7-segment encoding
//!
//! ```text
//!      a
//!     ---
//!  f |   | b
//!     -g-
//!  e |   | c
//!     ---   . dp
//!      d
//! ```
//!
//! Bit 0 is segment `a` up to bit 6 for segment `g`; bit 7 is the decimal
//! point.

/// Segment masks for hex digits 0-F
pub const HEX_TO_SEGMENTS: [u8; 16] = [
    // .gfedcba
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
    0b0111_0111, // A
    0b0111_1100, // b
    0b0011_1001, // C
    0b0101_1110, // d
    0b0111_1001, // E
    0b0111_0001, // F
];

/// Segment pattern for one digit position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentPattern(pub u8);

impl SegmentPattern {
    /// All segments off
    pub const BLANK: Self = Self(0);

    /// Middle bar only
    pub const MINUS: Self = Self(0b0100_0000);

    /// Decimal point bit
    pub const DECIMAL_POINT: u8 = 0b1000_0000;

    /// Raw register value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Same pattern with the decimal point lit
    pub const fn with_decimal_point(self) -> Self {
        Self(self.0 | Self::DECIMAL_POINT)
    }

    /// True if the decimal point is lit
    pub const fn has_decimal_point(self) -> bool {
        self.0 & Self::DECIMAL_POINT != 0
    }

    /// Segments a..g without the decimal point
    pub const fn segments(self) -> u8 {
        self.0 & !Self::DECIMAL_POINT
    }
}

impl From<u8> for SegmentPattern {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

/// Map a hex value to its table index
///
/// Accepts 0-15 and ASCII `a`-`f` / `A`-`F`.
pub fn hex_nibble(value: u8) -> Option<u8> {
    match value {
        0..=15 => Some(value),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

/// Encode a hex value into a segment pattern
///
/// Unrecognised values give [`SegmentPattern::BLANK`] with the decimal
/// point left off.
pub fn encode(value: u8, decimal_point: bool) -> SegmentPattern {
    let Some(nibble) = hex_nibble(value) else {
        return SegmentPattern::BLANK;
    };

    let pattern = SegmentPattern(HEX_TO_SEGMENTS[nibble as usize]);
    if decimal_point {
        pattern.with_decimal_point()
    } else {
        pattern
    }
}

/// Encode a decimal digit (0-9); out of range gives blank
pub fn encode_digit(digit: u8) -> SegmentPattern {
    if digit > 9 {
        return SegmentPattern::BLANK;
    }
    encode(digit, false)
}
