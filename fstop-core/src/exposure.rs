//! F-stop exposure maths
//!
//! Darkroom test strips step the exposure time in fractions of a stop
//! rather than in fixed seconds. A stop doubles the light, so step `k`
//! of an `interval`-stop series is `base * 2^(k * interval)`.

/// Number of exposures in a series (three below base, base, three above)
pub const SERIES_LEN: usize = 7;

/// Exposure times around `base_seconds` in steps of `interval` stops
///
/// Index 3 is always `base_seconds`.
pub fn fstop_series(base_seconds: f32, interval: f32) -> [f32; SERIES_LEN] {
    let mut series = [0.0; SERIES_LEN];
    for (i, slot) in series.iter_mut().enumerate() {
        let k = i as f32 - 3.0;
        *slot = base_seconds * libm::exp2f(k * interval);
    }
    series
}

/// Interval from the config's hundredths of a stop
pub fn interval_from_hundredths(hundredths: u8) -> f32 {
    hundredths as f32 / 100.0
}
