//! Two-wire bus capabilities
//!
//! The bit-banged display protocol needs a clock line that is always an
//! output and a data line that switches direction to read the chip's
//! acknowledgment. The platform supplies those primitives; the driver never
//! touches a register itself.

/// Capabilities a bit-banged two-wire driver consumes
///
/// Implementations are expected to be cheap, blocking and non-reentrant.
/// Callers must not drive the same lines from an interrupt while a driver
/// call is in progress.
pub trait PlatformBinding {
    /// Bring up the platform layer (clocks, pin muxing)
    fn init(&mut self) {}

    /// Release the platform layer
    fn deinit(&mut self) {}

    /// Switch the data line to output mode
    fn configure_output(&mut self);

    /// Switch the data line to input mode (released)
    fn configure_input(&mut self);

    /// Drive the data line
    fn write_data(&mut self, high: bool);

    /// Sample the data line
    fn read_data(&mut self) -> bool;

    /// Drive the clock line
    fn write_clock(&mut self, high: bool);

    /// Busy-wait for `us` microseconds
    fn delay_us(&mut self, us: u32);
}

// Lets a driver borrow a binding the caller keeps ownership of.
impl<T: PlatformBinding + ?Sized> PlatformBinding for &mut T {
    fn init(&mut self) {
        (**self).init();
    }

    fn deinit(&mut self) {
        (**self).deinit();
    }

    fn configure_output(&mut self) {
        (**self).configure_output();
    }

    fn configure_input(&mut self) {
        (**self).configure_input();
    }

    fn write_data(&mut self, high: bool) {
        (**self).write_data(high);
    }

    fn read_data(&mut self) -> bool {
        (**self).read_data()
    }

    fn write_clock(&mut self, high: bool) {
        (**self).write_clock(high);
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us);
    }
}
