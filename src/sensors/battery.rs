//! Battery status synthesizer.

use rand::{Rng, rngs::StdRng};

use crate::readings::{BatteryReading, HealthStatus};

use super::types::{gaussian, round2};

/// Reported state-of-charge bounds (%).
const SOC_MIN: f64 = 20.0;
const SOC_MAX: f64 = 95.0;

/// Cumulative draw thresholds for Good (0.8) and Good+Fair (0.95).
const P_GOOD: f64 = 0.80;
const P_GOOD_OR_FAIR: f64 = 0.95;

/// Synthesizes one battery status reading.
///
/// Battery state has no diurnal baseline: voltage, current, and temperature
/// are plain Gaussians, state of charge is uniform over `[20, 95]`, and the
/// health classification is drawn 0.8/0.15/0.05 Good/Fair/Poor.
pub fn battery_reading(rng: &mut StdRng, battery_id: &str) -> BatteryReading {
    let voltage = round2(gaussian(rng, 48.0, 2.0));
    let current = round2(gaussian(rng, 10.0, 3.0));
    let state_of_charge = round2(rng.random_range(SOC_MIN..=SOC_MAX));
    let temperature = round2(gaussian(rng, 30.0, 3.0));

    let draw: f64 = rng.random();
    let health_status = if draw < P_GOOD {
        HealthStatus::Good
    } else if draw < P_GOOD_OR_FAIR {
        HealthStatus::Fair
    } else {
        HealthStatus::Poor
    };

    BatteryReading {
        battery_id: battery_id.to_string(),
        voltage,
        current,
        state_of_charge,
        temperature,
        health_status,
    }
}
