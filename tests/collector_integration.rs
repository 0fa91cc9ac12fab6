//! Integration tests for the background collection loop lifecycle.

mod common;

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use microgrid_telemetry::collector::Collector;
use microgrid_telemetry::config::EntityConfig;
use microgrid_telemetry::store::{Store, Table};
use tempfile::TempDir;

/// Collector whose database lives in a deletable subdirectory, so a test
/// can break and later restore the storage path underneath it.
fn collector_with_db_dir() -> (TempDir, PathBuf, Collector) {
    let dir = TempDir::new().expect("tempdir");
    let db_dir = dir.path().join("db");
    fs::create_dir(&db_dir).expect("create db dir");
    let store = Store::open(db_dir.join("test.db")).expect("open store");
    (dir, db_dir, Collector::new(store, EntityConfig::default()))
}

/// Per-table row counts `(solar, weather, consumption, battery)`.
fn counts(store: &Store) -> (u64, u64, u64, u64) {
    (
        store.count(Table::Solar).expect("solar count"),
        store.count(Table::Weather).expect("weather count"),
        store.count(Table::Consumption).expect("consumption count"),
        store.count(Table::Battery).expect("battery count"),
    )
}

/// With the default entity set every completed cycle writes 3/1/5/2 rows,
/// and stop never truncates a cycle, so counts must be exact multiples.
fn assert_whole_cycles(store: &Store) -> u64 {
    let (solar, weather, consumption, battery) = counts(store);
    assert_eq!(solar, 3 * weather, "solar rows not a whole cycle multiple");
    assert_eq!(
        consumption,
        5 * weather,
        "consumption rows not a whole cycle multiple"
    );
    assert_eq!(battery, 2 * weather, "battery rows not a whole cycle multiple");
    weather
}

#[test]
fn background_loop_collects_until_stopped() {
    let (_dir, mut collector) = common::temp_collector();

    collector.start(Duration::from_millis(50));
    assert!(collector.is_running());
    thread::sleep(Duration::from_millis(220));
    collector.stop();
    assert!(!collector.is_running());

    let cycles = assert_whole_cycles(collector.store());
    assert!(cycles >= 1, "at least one cycle should have completed");
}

#[test]
fn double_start_leaves_exactly_one_loop() {
    let (_dir, mut collector) = common::temp_collector();

    collector.start(Duration::from_secs(1));
    collector.start(Duration::from_secs(1)); // no-op with a warning
    assert!(collector.is_running());

    thread::sleep(Duration::from_millis(1200));
    collector.stop();

    // One loop fits at most 3 cycles in this window (t=0s, 1s, and the
    // boundary check after stop); a duplicate loop would double the rate.
    let cycles = assert_whole_cycles(collector.store());
    assert!((1..=3).contains(&cycles), "unexpected cycle count {cycles}");
}

#[test]
fn stop_then_start_resumes_collection() {
    let (_dir, mut collector) = common::temp_collector();

    collector.start(Duration::from_millis(50));
    thread::sleep(Duration::from_millis(120));
    collector.stop();
    let after_first = assert_whole_cycles(collector.store());

    collector.start(Duration::from_millis(50));
    assert!(collector.is_running());
    thread::sleep(Duration::from_millis(120));
    collector.stop();
    let after_second = assert_whole_cycles(collector.store());

    assert!(
        after_second > after_first,
        "restart should keep collecting: {after_first} -> {after_second}"
    );
}

#[test]
fn manual_cycles_and_loop_share_one_store() {
    let (_dir, mut collector) = common::temp_collector();

    collector.run_one_cycle().expect("manual cycle");
    collector.start(Duration::from_millis(50));
    thread::sleep(Duration::from_millis(120));
    collector.stop();

    let cycles = assert_whole_cycles(collector.store());
    assert!(cycles >= 2, "manual + background cycles expected, got {cycles}");
}

#[test]
fn failed_cycle_surfaces_a_cycle_error() {
    let (_dir, db_dir, collector) = collector_with_db_dir();
    collector.run_one_cycle().expect("healthy cycle");

    fs::remove_dir_all(&db_dir).expect("remove db dir");
    let err = collector
        .run_one_cycle()
        .expect_err("cycle against a missing database path must fail");
    assert!(err.to_string().contains("collection cycle failed"));
}

#[test]
fn loop_outlives_failing_cycles_and_recovers() {
    let (_dir, db_dir, mut collector) = collector_with_db_dir();

    // Every cycle fails while the path is gone; the loop must keep going.
    fs::remove_dir_all(&db_dir).expect("remove db dir");
    collector.start(Duration::from_millis(30));
    thread::sleep(Duration::from_millis(150));
    assert!(collector.is_running(), "failing cycles must not stop the loop");

    // Restore the path and schema; cycles reconnect per operation.
    fs::create_dir(&db_dir).expect("recreate db dir");
    Store::open(db_dir.join("test.db")).expect("recreate schema");
    thread::sleep(Duration::from_millis(200));
    collector.stop();

    let cycles = assert_whole_cycles(collector.store());
    assert!(
        cycles >= 1,
        "loop should resume writing once the path is restored"
    );
}

#[test]
fn foreground_queries_tolerate_a_running_loop() {
    let (_dir, mut collector) = common::temp_collector();

    collector.start(Duration::from_millis(20));
    for _ in 0..10 {
        // Reads race the background writer; they must never error.
        collector
            .store()
            .get_recent(Table::Solar, 1)
            .expect("concurrent read");
        collector.store().summary().expect("concurrent summary");
        thread::sleep(Duration::from_millis(10));
    }
    collector.stop();
}
