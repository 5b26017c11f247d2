//! Decimal layout for multi-digit numeric displays
//!
//! Both display chips show numbers right-aligned: the least significant
//! digit sits in the rightmost position, a minus sign directly left of the
//! most significant digit and blanks everywhere else. This module computes
//! that layout once; each driver only maps cells to its own codes.

use heapless::Vec;

/// Maximum positions any supported display has
pub const MAX_CELLS: usize = 8;

/// What a single position shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// Nothing lit
    Blank,
    /// Minus sign
    Minus,
    /// Decimal digit 0-9
    Digit(u8),
}

/// One display position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    pub glyph: Glyph,
    /// Decimal point after this position
    pub point: bool,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: Glyph::Blank,
        point: false,
    };

    const fn digit(d: u8) -> Self {
        Self {
            glyph: Glyph::Digit(d),
            point: false,
        }
    }
}

/// Lay out `value` with `decimals` fractional digits over `width` positions
///
/// Index 0 of the result is the least significant (rightmost) position.
/// The result always has exactly `width` cells (capped at [`MAX_CELLS`]).
///
/// Numbers wider than the display keep their least significant digits; a
/// minus sign that no longer fits is dropped. Zero renders as a single `0`
/// (or `0.0`, `0.00`, ... with decimals), never as an empty display.
///
/// When `decimals` is at least `width` the leading zeros of the fraction
/// do not fit; the point then goes on the most significant kept digit so
/// the value still reads as a fraction.
pub fn render_decimal(value: i32, decimals: u8, width: usize) -> Vec<Cell, MAX_CELLS> {
    let width = width.min(MAX_CELLS);
    let mut cells: Vec<Cell, MAX_CELLS> = Vec::new();

    let mut magnitude = value.unsigned_abs();
    let min_digits = decimals as usize + 1;

    while cells.len() < width && (magnitude != 0 || cells.len() < min_digits) {
        let mut cell = Cell::digit((magnitude % 10) as u8);
        cell.point = decimals != 0 && cells.len() == decimals as usize;
        // Capacity is MAX_CELLS and width never exceeds it
        let _ = cells.push(cell);
        magnitude /= 10;
    }

    if decimals != 0 && decimals as usize >= cells.len() {
        if let Some(top) = cells.last_mut() {
            top.point = true;
        }
    }

    if value < 0 && cells.len() < width {
        let _ = cells.push(Cell {
            glyph: Glyph::Minus,
            point: false,
        });
    }

    while cells.len() < width {
        let _ = cells.push(Cell::BLANK);
    }

    cells
}
