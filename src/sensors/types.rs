//! Shared noise and rounding helpers for the signal synthesizers.

use rand::{Rng, rngs::StdRng};

/// Daylight window shared by the solar and weather baselines (inclusive hours).
pub const DAYLIGHT_START_HOUR: u32 = 6;
pub const DAYLIGHT_END_HOUR: u32 = 18;

/// Returns true when `hour` falls inside the daylight window.
pub fn is_daylight(hour: u32) -> bool {
    (DAYLIGHT_START_HOUR..=DAYLIGHT_END_HOUR).contains(&hour)
}

/// Gaussian sample with the given mean and standard deviation, via the
/// Box-Muller transform.
///
/// Returns `mean` unchanged when `std_dev <= 0`.
pub fn gaussian(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return mean;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z0 * std_dev
}

/// Rounds to exactly 2 decimal places. Every numeric field of every reading
/// passes through here before leaving a synthesizer.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
