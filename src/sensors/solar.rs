//! Solar panel signal synthesizer.

use rand::rngs::StdRng;

use crate::readings::SolarReading;

use super::types::{DAYLIGHT_START_HOUR, gaussian, is_daylight, round2};

/// Rough irradiance-to-power conversion factor for the simulated panels.
const POWER_PER_IRRADIANCE: f64 = 0.2;

/// Synthesizes one solar panel reading for the given wall-clock hour.
///
/// The baseline follows a half-sine over the 06:00-18:00 daylight window:
/// irradiance peaks at 800 W/m² around noon and is exactly zero at night,
/// as is output power. Bounded Gaussian noise is layered on top; negative
/// irradiance is clamped to zero and current is zero whenever the (noisy)
/// voltage would be zero.
pub fn solar_reading(rng: &mut StdRng, panel_id: &str, hour: u32) -> SolarReading {
    let daylight = is_daylight(hour);

    let (base_irradiance, base_power) = if daylight {
        let phase = std::f64::consts::PI * (hour - DAYLIGHT_START_HOUR) as f64 / 12.0;
        let irr = 800.0 * phase.sin();
        (irr, irr * POWER_PER_IRRADIANCE)
    } else {
        (0.0, 0.0)
    };

    // Hard zero at night: no noise on a zero base.
    let irradiance = if daylight {
        round2((base_irradiance + gaussian(rng, 0.0, 50.0)).max(0.0))
    } else {
        0.0
    };

    let voltage = round2(gaussian(rng, 24.0, 2.0));
    let current = if daylight && voltage > 0.0 {
        round2(base_power / voltage)
    } else {
        0.0
    };
    let power = round2(voltage * current);
    let temperature = round2(gaussian(rng, 25.0, 5.0) + irradiance / 100.0);

    SolarReading {
        panel_id: panel_id.to_string(),
        voltage,
        current,
        power,
        temperature,
        irradiance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn is_rounded_2dp(x: f64) -> bool {
        (x * 100.0 - (x * 100.0).round()).abs() < 1e-9
    }

    #[test]
    fn no_irradiance_or_power_outside_daylight() {
        let mut rng = rng();
        for hour in [0, 1, 5, 19, 22, 23] {
            for _ in 0..50 {
                let r = solar_reading(&mut rng, "PANEL_001", hour);
                assert_eq!(r.irradiance, 0.0, "irradiance at hour {hour}");
                assert_eq!(r.power, 0.0, "power at hour {hour}");
                assert_eq!(r.current, 0.0, "current at hour {hour}");
            }
        }
    }

    #[test]
    fn noon_irradiance_near_peak() {
        let mut rng = rng();
        let r = solar_reading(&mut rng, "PANEL_001", 12);
        assert!(
            r.irradiance > 500.0,
            "noon irradiance should be near 800, got {}",
            r.irradiance
        );
        assert!(r.power > 0.0);
    }

    #[test]
    fn irradiance_never_negative() {
        let mut rng = rng();
        for hour in 0..24 {
            for _ in 0..100 {
                let r = solar_reading(&mut rng, "PANEL_001", hour);
                assert!(r.irradiance >= 0.0);
            }
        }
    }

    #[test]
    fn all_fields_rounded_to_two_decimals() {
        let mut rng = rng();
        for hour in 0..24 {
            let r = solar_reading(&mut rng, "PANEL_001", hour);
            for (name, value) in [
                ("voltage", r.voltage),
                ("current", r.current),
                ("power", r.power),
                ("temperature", r.temperature),
                ("irradiance", r.irradiance),
            ] {
                assert!(is_rounded_2dp(value), "{name} not rounded: {value}");
            }
        }
    }

    #[test]
    fn deterministic_with_same_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for hour in 0..24 {
            assert_eq!(
                solar_reading(&mut a, "PANEL_001", hour),
                solar_reading(&mut b, "PANEL_001", hour)
            );
        }
    }

    #[test]
    fn panel_id_is_preserved() {
        let mut rng = rng();
        let r = solar_reading(&mut rng, "PANEL_003", 12);
        assert_eq!(r.panel_id, "PANEL_003");
    }
}
