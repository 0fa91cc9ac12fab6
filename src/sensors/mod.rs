//! Signal synthesizers: pure functions mapping (entity id, hour) to a
//! plausible reading, built from diurnal sinusoidal baselines plus bounded
//! Gaussian noise.

pub mod battery;
pub mod consumption;
pub mod solar;
pub mod types;
pub mod weather;

pub use battery::battery_reading;
pub use consumption::consumption_reading;
pub use solar::solar_reading;
pub use weather::weather_reading;
