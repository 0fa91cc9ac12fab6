//! Weather station signal synthesizer.

use rand::{Rng, rngs::StdRng};

use crate::readings::{WeatherReading, WindDirection};

use super::types::{DAYLIGHT_START_HOUR, gaussian, round2};

/// Synthesizes one weather reading for the given wall-clock hour.
///
/// Temperature follows a diurnal sinusoid around 25 °C; the sun position is
/// a simplified half-sine elevation with a 15°-per-hour azimuth sweep.
/// Wind speed and cloud cover are folded Gaussians, so both stay non-negative.
pub fn weather_reading(rng: &mut StdRng, location: &str, hour: u32) -> WeatherReading {
    let phase = std::f64::consts::PI * (hour as f64 - DAYLIGHT_START_HOUR as f64) / 12.0;

    let temperature = round2(25.0 + 10.0 * phase.sin() + gaussian(rng, 0.0, 2.0));
    let humidity = round2(gaussian(rng, 60.0, 10.0));
    let pressure = round2(gaussian(rng, 1013.0, 5.0));
    let wind_speed = round2(gaussian(rng, 15.0, 5.0).abs());
    let wind_direction = WindDirection::ALL[rng.random_range(0..WindDirection::ALL.len())];
    let cloud_cover = round2(gaussian(rng, 30.0, 20.0).abs());
    let sun_elevation = round2((90.0 * phase.sin()).max(0.0));
    let sun_direction = round2((hour as f64 - DAYLIGHT_START_HOUR as f64) * 15.0);

    WeatherReading {
        location: location.to_string(),
        temperature,
        humidity,
        pressure,
        wind_speed,
        wind_direction,
        cloud_cover,
        sun_elevation,
        sun_direction,
    }
}
