//! Configuration type definitions
//!
//! The timer configuration is fixed at build time: the firmware's build
//! script validates `timer.toml` and emits a [`TimerConfig`] constant.
//! [`TimerConfig::validate`] applies the same limits at runtime.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest TM1637 brightness step
pub const MAX_BRIGHTNESS: u8 = 7;

/// Highest MAX7219 intensity step
pub const MAX_INTENSITY: u8 = 15;

/// Digit registers on a MAX7219
pub const MAX_SHIFT_DIGITS: u8 = 8;

/// Firmware input poll period; also the shortest countdown tick
pub const MIN_TICK_MS: u16 = 8;

/// Attached display chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DisplayKind {
    /// Two-wire 6 digit 7-segment controller
    Tm1637,
    /// Shift-register LED driver in Code-B decode mode
    #[default]
    Max7219,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Brightness above 7
    BrightnessOutOfRange,
    /// Intensity above 15
    IntensityOutOfRange,
    /// Digit count not in 1-8
    DigitsOutOfRange,
    /// Countdown tick below [`MIN_TICK_MS`]
    TickTooShort,
    /// F-stop interval of zero
    ZeroInterval,
}

/// Timer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerConfig {
    /// Display chip on this board
    pub display: DisplayKind,
    /// TM1637 brightness (0-7)
    pub brightness: u8,
    /// MAX7219 intensity (0-15)
    pub intensity: u8,
    /// MAX7219 digits wired (1-8)
    pub digits: u8,
    /// Exposure time selected at power-on
    pub default_seconds: u8,
    /// Countdown step period in ms
    pub tick_ms: u16,
    /// Test strip step in hundredths of a stop
    pub fstop_interval_hundredths: u8,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            display: DisplayKind::Max7219,
            brightness: 4,
            intensity: 4,
            digits: 4,
            default_seconds: 10,
            tick_ms: 100,
            fstop_interval_hundredths: 50,
        }
    }
}

impl TimerConfig {
    /// Check every field against its hardware limit
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::BrightnessOutOfRange);
        }
        if self.intensity > MAX_INTENSITY {
            return Err(ConfigError::IntensityOutOfRange);
        }
        if self.digits == 0 || self.digits > MAX_SHIFT_DIGITS {
            return Err(ConfigError::DigitsOutOfRange);
        }
        if self.tick_ms < MIN_TICK_MS {
            return Err(ConfigError::TickTooShort);
        }
        if self.fstop_interval_hundredths == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
