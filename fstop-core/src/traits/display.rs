//! Numeric display trait
//!
//! Both supported display chips can show a signed number. The application
//! picks one at start-up based on the attached hardware and only talks to
//! it through this trait.

/// A multi-digit numeric display
pub trait NumericDisplay {
    /// Error reported by the underlying bus
    type Error;

    /// Number of digit positions
    fn digit_count(&self) -> usize;

    /// Blank every digit
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Show `value` scaled by `10^decimals`
    ///
    /// `show_fixed(52, 1)` shows `5.2`. Layout follows
    /// [`crate::render::render_decimal`].
    fn show_fixed(&mut self, value: i32, decimals: u8) -> Result<(), Self::Error>;

    /// Show an integer
    fn show_number(&mut self, value: i32) -> Result<(), Self::Error> {
        self.show_fixed(value, 0)
    }
}

impl<T: NumericDisplay + ?Sized> NumericDisplay for &mut T {
    type Error = T::Error;

    fn digit_count(&self) -> usize {
        (**self).digit_count()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        (**self).clear()
    }

    fn show_fixed(&mut self, value: i32, decimals: u8) -> Result<(), Self::Error> {
        (**self).show_fixed(value, decimals)
    }
}
