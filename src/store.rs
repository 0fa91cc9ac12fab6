//! SQLite-backed append-only store for synthesized readings.
//!
//! Every operation opens, uses, and drops its own connection, so the
//! background collection loop and foreground queries never contend for a
//! shared handle. All SQL text is fixed per [`Table`] variant; values are
//! always bound parameters.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, params};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::readings::{
    BatteryReading, ConsumptionReading, Reading, SolarReading, StoredReading, WeatherReading,
};

/// Trailing window for [`Store::summary`] aggregates.
const SUMMARY_WINDOW_HOURS: i64 = 24;

/// Closed set of table identifiers.
///
/// Table names never come from runtime strings; each variant maps to
/// hardcoded DDL and DML below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Solar,
    Weather,
    Consumption,
    Battery,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Solar,
        Table::Weather,
        Table::Consumption,
        Table::Battery,
    ];

    /// The underlying SQLite table name.
    pub fn name(self) -> &'static str {
        match self {
            Table::Solar => "solar_sensors",
            Table::Weather => "weather_data",
            Table::Consumption => "energy_consumption",
            Table::Battery => "battery_status",
        }
    }

    /// Which table a reading belongs to.
    pub fn of(reading: &Reading) -> Table {
        match reading {
            Reading::Solar(_) => Table::Solar,
            Reading::Weather(_) => Table::Weather,
            Reading::Consumption(_) => Table::Consumption,
            Reading::Battery(_) => Table::Battery,
        }
    }

    fn create_sql(self) -> &'static str {
        match self {
            Table::Solar => {
                "CREATE TABLE IF NOT EXISTS solar_sensors (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp INTEGER NOT NULL,
                    panel_id TEXT NOT NULL,
                    voltage REAL NOT NULL,
                    current REAL NOT NULL,
                    power REAL NOT NULL,
                    temperature REAL NOT NULL,
                    irradiance REAL NOT NULL
                )"
            }
            Table::Weather => {
                "CREATE TABLE IF NOT EXISTS weather_data (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp INTEGER NOT NULL,
                    location TEXT NOT NULL,
                    temperature REAL NOT NULL,
                    humidity REAL NOT NULL,
                    pressure REAL NOT NULL,
                    wind_speed REAL NOT NULL,
                    wind_direction TEXT NOT NULL,
                    cloud_cover REAL NOT NULL,
                    sun_elevation REAL NOT NULL,
                    sun_direction REAL NOT NULL
                )"
            }
            Table::Consumption => {
                "CREATE TABLE IF NOT EXISTS energy_consumption (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp INTEGER NOT NULL,
                    household_id TEXT NOT NULL,
                    power_consumption REAL NOT NULL,
                    voltage REAL NOT NULL,
                    frequency REAL NOT NULL
                )"
            }
            Table::Battery => {
                "CREATE TABLE IF NOT EXISTS battery_status (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp INTEGER NOT NULL,
                    battery_id TEXT NOT NULL,
                    voltage REAL NOT NULL,
                    current REAL NOT NULL,
                    state_of_charge REAL NOT NULL,
                    temperature REAL NOT NULL,
                    health_status TEXT NOT NULL
                )"
            }
        }
    }

    fn insert_sql(self) -> &'static str {
        match self {
            Table::Solar => {
                "INSERT INTO solar_sensors
                    (timestamp, panel_id, voltage, current, power, temperature, irradiance)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            }
            Table::Weather => {
                "INSERT INTO weather_data
                    (timestamp, location, temperature, humidity, pressure, wind_speed,
                     wind_direction, cloud_cover, sun_elevation, sun_direction)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            }
            Table::Consumption => {
                "INSERT INTO energy_consumption
                    (timestamp, household_id, power_consumption, voltage, frequency)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            }
            Table::Battery => {
                "INSERT INTO battery_status
                    (timestamp, battery_id, voltage, current, state_of_charge,
                     temperature, health_status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            }
        }
    }

    fn select_recent_sql(self) -> &'static str {
        match self {
            Table::Solar => {
                "SELECT id, timestamp, panel_id, voltage, current, power, temperature, irradiance
                 FROM solar_sensors WHERE timestamp > ?1
                 ORDER BY timestamp DESC, id DESC"
            }
            Table::Weather => {
                "SELECT id, timestamp, location, temperature, humidity, pressure, wind_speed,
                        wind_direction, cloud_cover, sun_elevation, sun_direction
                 FROM weather_data WHERE timestamp > ?1
                 ORDER BY timestamp DESC, id DESC"
            }
            Table::Consumption => {
                "SELECT id, timestamp, household_id, power_consumption, voltage, frequency
                 FROM energy_consumption WHERE timestamp > ?1
                 ORDER BY timestamp DESC, id DESC"
            }
            Table::Battery => {
                "SELECT id, timestamp, battery_id, voltage, current, state_of_charge,
                        temperature, health_status
                 FROM battery_status WHERE timestamp > ?1
                 ORDER BY timestamp DESC, id DESC"
            }
        }
    }

    fn count_sql(self) -> &'static str {
        match self {
            Table::Solar => "SELECT COUNT(*) FROM solar_sensors",
            Table::Weather => "SELECT COUNT(*) FROM weather_data",
            Table::Consumption => "SELECT COUNT(*) FROM energy_consumption",
            Table::Battery => "SELECT COUNT(*) FROM battery_status",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store failures, split along the caller-facing taxonomy: schema problems
/// are fatal at construction, insert failures abandon the current cycle,
/// query failures surface to the reporting caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database at {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("schema setup failed: {0}")]
    Setup(#[source] rusqlite::Error),
    #[error("insert into {table} failed: {source}")]
    Insert {
        table: Table,
        source: rusqlite::Error,
    },
    #[error("query on {table} failed: {source}")]
    Query {
        table: Table,
        source: rusqlite::Error,
    },
    #[error("summary query failed: {0}")]
    Summary(#[source] rusqlite::Error),
}

/// Trailing-24-hour solar aggregates. All-zero over an empty window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarSummary {
    pub total_readings: u64,
    pub avg_power: f64,
    pub max_power: f64,
    pub avg_temperature: f64,
}

/// Trailing-24-hour consumption aggregates. All-zero over an empty window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionSummary {
    pub total_readings: u64,
    pub avg_consumption: f64,
    pub total_consumption: f64,
}

/// Summary statistics across the categories with rolling aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub solar: SolarSummary,
    pub consumption: ConsumptionSummary,
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SOLAR (24h):       readings={:<5} avg_power={:.2} W  max_power={:.2} W  avg_temp={:.2} °C",
            self.solar.total_readings,
            self.solar.avg_power,
            self.solar.max_power,
            self.solar.avg_temperature
        )?;
        write!(
            f,
            "CONSUMPTION (24h): readings={:<5} avg={:.2} kW  total={:.2} kW",
            self.consumption.total_readings,
            self.consumption.avg_consumption,
            self.consumption.total_consumption
        )
    }
}

/// Handle to the on-disk database. Cloning is cheap: the handle carries only
/// the path, and every operation opens its own connection.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens (or creates) the database and sets up all four tables
    /// idempotently.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the database cannot be opened and
    /// [`StoreError::Setup`] when schema creation fails. Both are fatal:
    /// nothing else works without the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        let conn = store.connect().map_err(|e| StoreError::Open {
            path: store.path.clone(),
            source: e,
        })?;
        // WAL lets the background loop write while foreground queries read.
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(StoreError::Setup)?;
        for table in Table::ALL {
            conn.execute(table.create_sql(), [])
                .map_err(StoreError::Setup)?;
        }
        info!(path = %store.path.display(), "database schema ready");
        Ok(store)
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(StdDuration::from_secs(5))?;
        Ok(conn)
    }

    /// Appends one reading, assigning the row id and the write-time UTC
    /// timestamp. Rows are immutable once written.
    pub fn insert(&self, reading: &Reading) -> Result<(), StoreError> {
        let table = Table::of(reading);
        let conn = self
            .connect()
            .map_err(|e| StoreError::Insert { table, source: e })?;
        let timestamp = Utc::now().timestamp();

        let result = match reading {
            Reading::Solar(r) => conn.execute(
                table.insert_sql(),
                params![
                    timestamp,
                    r.panel_id,
                    r.voltage,
                    r.current,
                    r.power,
                    r.temperature,
                    r.irradiance
                ],
            ),
            Reading::Weather(r) => conn.execute(
                table.insert_sql(),
                params![
                    timestamp,
                    r.location,
                    r.temperature,
                    r.humidity,
                    r.pressure,
                    r.wind_speed,
                    r.wind_direction,
                    r.cloud_cover,
                    r.sun_elevation,
                    r.sun_direction
                ],
            ),
            Reading::Consumption(r) => conn.execute(
                table.insert_sql(),
                params![
                    timestamp,
                    r.household_id,
                    r.power_consumption,
                    r.voltage,
                    r.frequency
                ],
            ),
            Reading::Battery(r) => conn.execute(
                table.insert_sql(),
                params![
                    timestamp,
                    r.battery_id,
                    r.voltage,
                    r.current,
                    r.state_of_charge,
                    r.temperature,
                    r.health_status
                ],
            ),
        };

        result.map_err(|e| StoreError::Insert { table, source: e })?;
        Ok(())
    }

    /// Fetches rows strictly newer than `now - hours`, newest first.
    ///
    /// `hours = 0` always yields an empty vec. A stored timestamp outside
    /// the representable range is a query error, not a silent default.
    pub fn get_recent(&self, table: Table, hours: u32) -> Result<Vec<StoredReading>, StoreError> {
        let conn = self
            .connect()
            .map_err(|e| StoreError::Query { table, source: e })?;
        let cutoff = (Utc::now() - Duration::hours(i64::from(hours))).timestamp();

        let mut stmt = conn
            .prepare(table.select_recent_sql())
            .map_err(|e| StoreError::Query { table, source: e })?;
        let rows = stmt
            .query_map(params![cutoff], |row| {
                let id: i64 = row.get(0)?;
                let ts: i64 = row.get(1)?;
                let reading = match table {
                    Table::Solar => Reading::Solar(SolarReading {
                        panel_id: row.get(2)?,
                        voltage: row.get(3)?,
                        current: row.get(4)?,
                        power: row.get(5)?,
                        temperature: row.get(6)?,
                        irradiance: row.get(7)?,
                    }),
                    Table::Weather => Reading::Weather(WeatherReading {
                        location: row.get(2)?,
                        temperature: row.get(3)?,
                        humidity: row.get(4)?,
                        pressure: row.get(5)?,
                        wind_speed: row.get(6)?,
                        wind_direction: row.get(7)?,
                        cloud_cover: row.get(8)?,
                        sun_elevation: row.get(9)?,
                        sun_direction: row.get(10)?,
                    }),
                    Table::Consumption => Reading::Consumption(ConsumptionReading {
                        household_id: row.get(2)?,
                        power_consumption: row.get(3)?,
                        voltage: row.get(4)?,
                        frequency: row.get(5)?,
                    }),
                    Table::Battery => Reading::Battery(BatteryReading {
                        battery_id: row.get(2)?,
                        voltage: row.get(3)?,
                        current: row.get(4)?,
                        state_of_charge: row.get(5)?,
                        temperature: row.get(6)?,
                        health_status: row.get(7)?,
                    }),
                };
                let timestamp = DateTime::from_timestamp(ts, 0)
                    .ok_or(rusqlite::Error::IntegralValueOutOfRange(1, ts))?;
                Ok(StoredReading {
                    id,
                    timestamp,
                    reading,
                })
            })
            .map_err(|e| StoreError::Query { table, source: e })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Query { table, source: e })?;

        Ok(rows)
    }

    /// Total row count of a table.
    pub fn count(&self, table: Table) -> Result<u64, StoreError> {
        let conn = self
            .connect()
            .map_err(|e| StoreError::Query { table, source: e })?;
        conn.query_row(table.count_sql(), [], |row| row.get::<_, u64>(0))
            .map_err(|e| StoreError::Query { table, source: e })
    }

    /// Summary aggregates over the trailing 24-hour window for the solar and
    /// consumption tables. Zero rows produce all-zero aggregates, never an
    /// error.
    pub fn summary(&self) -> Result<SummaryReport, StoreError> {
        let conn = self.connect().map_err(StoreError::Summary)?;
        let cutoff = (Utc::now() - Duration::hours(SUMMARY_WINDOW_HOURS)).timestamp();

        let solar = conn
            .query_row(
                "SELECT COUNT(*),
                        COALESCE(AVG(power), 0.0),
                        COALESCE(MAX(power), 0.0),
                        COALESCE(AVG(temperature), 0.0)
                 FROM solar_sensors WHERE timestamp > ?1",
                params![cutoff],
                |row| {
                    Ok(SolarSummary {
                        total_readings: row.get(0)?,
                        avg_power: row.get(1)?,
                        max_power: row.get(2)?,
                        avg_temperature: row.get(3)?,
                    })
                },
            )
            .map_err(StoreError::Summary)?;

        let consumption = conn
            .query_row(
                "SELECT COUNT(*),
                        COALESCE(AVG(power_consumption), 0.0),
                        COALESCE(SUM(power_consumption), 0.0)
                 FROM energy_consumption WHERE timestamp > ?1",
                params![cutoff],
                |row| {
                    Ok(ConsumptionSummary {
                        total_readings: row.get(0)?,
                        avg_consumption: row.get(1)?,
                        total_consumption: row.get(2)?,
                    })
                },
            )
            .map_err(StoreError::Summary)?;

        Ok(SummaryReport { solar, consumption })
    }
}
