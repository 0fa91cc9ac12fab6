//! Reading record types shared by the synthesizers, the store, and reporting.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use serde::Serialize;

/// One sample from a simulated solar panel.
///
/// All numeric fields are rounded to 2 decimal places at synthesis time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarReading {
    /// Fixed panel identifier (e.g. `PANEL_001`).
    pub panel_id: String,
    /// Panel voltage (V).
    pub voltage: f64,
    /// Panel current (A).
    pub current: f64,
    /// Output power (W), zero outside daylight hours.
    pub power: f64,
    /// Panel temperature (°C).
    pub temperature: f64,
    /// Solar irradiance (W/m²), zero outside daylight hours.
    pub irradiance: f64,
}

/// One sample from a simulated weather station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    /// Fixed location name.
    pub location: String,
    /// Ambient temperature (°C).
    pub temperature: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Barometric pressure (hPa).
    pub pressure: f64,
    /// Wind speed (km/h, non-negative).
    pub wind_speed: f64,
    /// Wind direction as one of 8 compass points.
    pub wind_direction: WindDirection,
    /// Cloud cover (%).
    pub cloud_cover: f64,
    /// Sun elevation above the horizon (degrees, zero at night).
    pub sun_elevation: f64,
    /// Sun azimuth approximation (degrees from east at 15°/hour).
    pub sun_direction: f64,
}

/// One sample of a household's energy consumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionReading {
    /// Fixed household identifier (e.g. `HH_001`).
    pub household_id: String,
    /// Power draw (kW), floored at standby minimum.
    pub power_consumption: f64,
    /// Supply voltage (V).
    pub voltage: f64,
    /// Grid frequency (Hz).
    pub frequency: f64,
}

/// One status sample from a simulated battery bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryReading {
    /// Fixed battery identifier (e.g. `BAT_001`).
    pub battery_id: String,
    /// Bank voltage (V).
    pub voltage: f64,
    /// Charge/discharge current (A, sign follows flow direction).
    pub current: f64,
    /// State of charge (%), always within `[20, 95]`.
    pub state_of_charge: f64,
    /// Battery temperature (°C).
    pub temperature: f64,
    /// Coarse health classification.
    pub health_status: HealthStatus,
}

/// Sum type over the four reading kinds, used for uniform insert/fetch paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Reading {
    Solar(SolarReading),
    Weather(WeatherReading),
    Consumption(ConsumptionReading),
    Battery(BatteryReading),
}

/// A reading as persisted: store-assigned row id and write-time timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredReading {
    /// Monotonic row identifier assigned by the store.
    pub id: i64,
    /// UTC timestamp assigned at write time.
    pub timestamp: DateTime<Utc>,
    pub reading: Reading,
}

/// Eight-point compass wind direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WindDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl WindDirection {
    /// All directions, in compass order. Used for uniform sampling.
    pub const ALL: [WindDirection; 8] = [
        WindDirection::N,
        WindDirection::NE,
        WindDirection::E,
        WindDirection::SE,
        WindDirection::S,
        WindDirection::SW,
        WindDirection::W,
        WindDirection::NW,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WindDirection::N => "N",
            WindDirection::NE => "NE",
            WindDirection::E => "E",
            WindDirection::SE => "SE",
            WindDirection::S => "S",
            WindDirection::SW => "SW",
            WindDirection::W => "W",
            WindDirection::NW => "NW",
        }
    }
}

impl FromStr for WindDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(WindDirection::N),
            "NE" => Ok(WindDirection::NE),
            "E" => Ok(WindDirection::E),
            "SE" => Ok(WindDirection::SE),
            "S" => Ok(WindDirection::S),
            "SW" => Ok(WindDirection::SW),
            "W" => Ok(WindDirection::W),
            "NW" => Ok(WindDirection::NW),
            other => Err(format!("unknown wind direction \"{other}\"")),
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Battery health classification, drawn with fixed probabilities
/// (0.8 Good / 0.15 Fair / 0.05 Poor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Good => "Good",
            HealthStatus::Fair => "Fair",
            HealthStatus::Poor => "Poor",
        }
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Good" => Ok(HealthStatus::Good),
            "Fair" => Ok(HealthStatus::Fair),
            "Poor" => Ok(HealthStatus::Poor),
            other => Err(format!("unknown health status \"{other}\"")),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Both enums persist as TEXT columns.

impl ToSql for WindDirection {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for WindDirection {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

impl ToSql for HealthStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for HealthStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Solar(r) => write!(
                f,
                "{} | V={:>6.2}  I={:>5.2} A  P={:>7.2} W  T={:>5.2} °C  irr={:>7.2} W/m²",
                r.panel_id, r.voltage, r.current, r.power, r.temperature, r.irradiance
            ),
            Reading::Weather(r) => write!(
                f,
                "{} | T={:>5.2} °C  RH={:>5.2}%  p={:>7.2} hPa  wind={:>5.2} km/h {}  \
                 clouds={:>5.2}%  sun(el={:.2}°, dir={:.2}°)",
                r.location,
                r.temperature,
                r.humidity,
                r.pressure,
                r.wind_speed,
                r.wind_direction,
                r.cloud_cover,
                r.sun_elevation,
                r.sun_direction
            ),
            Reading::Consumption(r) => write!(
                f,
                "{} | load={:>5.2} kW  V={:>6.2}  f={:>5.2} Hz",
                r.household_id, r.power_consumption, r.voltage, r.frequency
            ),
            Reading::Battery(r) => write!(
                f,
                "{} | V={:>5.2}  I={:>6.2} A  SoC={:>5.2}%  T={:>5.2} °C  health={}",
                r.battery_id, r.voltage, r.current, r.state_of_charge, r.temperature, r.health_status
            ),
        }
    }
}

impl fmt::Display for StoredReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<5} {} | {}",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.reading
        )
    }
}
