//! IoT telemetry simulator for rural microgrid monitoring.
//!
//! Synthesizes plausible solar, weather, consumption, and battery readings
//! on a timer and appends them to a local SQLite store.

pub mod collector;
pub mod config;
pub mod readings;
/// Per-kind signal synthesizers and shared noise helpers.
pub mod sensors;
pub mod store;
