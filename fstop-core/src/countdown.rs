//! Exposure countdown
//!
//! A countdown runs in tenths of a second. Each tick yields the value to
//! show: the full duration, then every tenth down to zero inclusive, and
//! finally the full duration again so the display returns to the set time.

/// Countdown over tenths of a second
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Countdown {
    start_tenths: i32,
    remaining: i32,
    restored: bool,
}

impl Countdown {
    /// Count down from whole seconds
    pub fn from_seconds(seconds: u8) -> Self {
        Self::from_tenths(seconds as i32 * 10)
    }

    /// Count down from tenths of a second
    ///
    /// Negative durations behave as zero.
    pub fn from_tenths(tenths: i32) -> Self {
        let start_tenths = tenths.max(0);
        Self {
            start_tenths,
            remaining: start_tenths,
            restored: false,
        }
    }

    /// Duration this countdown started from, in tenths
    pub fn start_tenths(&self) -> i32 {
        self.start_tenths
    }

    /// True until the final frame has been yielded
    pub fn is_running(&self) -> bool {
        !self.restored
    }
}

impl Iterator for Countdown {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.remaining >= 0 {
            let value = self.remaining;
            self.remaining -= 1;
            return Some(value);
        }
        if !self.restored {
            self.restored = true;
            return Some(self.start_tenths);
        }
        None
    }
}
