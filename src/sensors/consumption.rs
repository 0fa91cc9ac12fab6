//! Household energy consumption synthesizer.

use rand::rngs::StdRng;

use crate::readings::ConsumptionReading;

use super::types::{gaussian, round2};

/// Active-use window (inclusive hours). Outside it households draw standby load.
const ACTIVE_START_HOUR: u32 = 6;
const ACTIVE_END_HOUR: u32 = 22;

/// Standby draw (kW) outside the active-use window.
const STANDBY_KW: f64 = 0.5;

/// Floor on the reported draw (kW).
const MIN_CONSUMPTION_KW: f64 = 0.1;

/// Synthesizes one household consumption reading for the given wall-clock hour.
///
/// Daytime draw follows a sinusoid over the 06:00-22:00 active window;
/// overnight the household sits at standby. The noisy draw is floored at
/// 0.1 kW so it can never go non-physical.
pub fn consumption_reading(rng: &mut StdRng, household_id: &str, hour: u32) -> ConsumptionReading {
    let base = if (ACTIVE_START_HOUR..=ACTIVE_END_HOUR).contains(&hour) {
        let phase = std::f64::consts::PI * (hour - ACTIVE_START_HOUR) as f64 / 16.0;
        2.0 + 3.0 * phase.sin()
    } else {
        STANDBY_KW
    };

    let power_consumption = round2((base + gaussian(rng, 0.0, 0.5)).max(MIN_CONSUMPTION_KW));
    let voltage = round2(gaussian(rng, 230.0, 5.0));
    let frequency = round2(gaussian(rng, 50.0, 0.1));

    ConsumptionReading {
        household_id: household_id.to_string(),
        power_consumption,
        voltage,
        frequency,
    }
}
