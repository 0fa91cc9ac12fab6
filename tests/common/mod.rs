//! Shared test fixtures for integration tests.

use microgrid_telemetry::collector::Collector;
use microgrid_telemetry::config::EntityConfig;
use microgrid_telemetry::store::Store;
use tempfile::TempDir;

/// Fresh store backed by a per-test temporary directory.
///
/// The `TempDir` must stay alive for the duration of the test; dropping it
/// deletes the database file.
pub fn temp_store() -> (TempDir, Store) {
    let dir = TempDir::new().expect("tempdir");
    let store = Store::open(dir.path().join("test.db")).expect("open store");
    (dir, store)
}

/// Collector over a fresh store with the default entity set
/// (3 panels, 1 location, 5 households, 2 batteries).
pub fn temp_collector() -> (TempDir, Collector) {
    let (dir, store) = temp_store();
    (dir, Collector::new(store, EntityConfig::default()))
}
