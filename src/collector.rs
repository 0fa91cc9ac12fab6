//! Collection scheduler: runs one synthesis+store cycle across all
//! configured entities, either on demand or on a fixed-interval background
//! loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{Local, Timelike};
use rand::{SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::EntityConfig;
use crate::readings::Reading;
use crate::sensors::{battery_reading, consumption_reading, solar_reading, weather_reading};
use crate::store::{Store, StoreError};

/// A failure during a single collection cycle. Rows already written by the
/// cycle stay; there is no rollback and no retry.
#[derive(Debug, Error)]
#[error("collection cycle failed: {0}")]
pub struct CycleError(#[from] StoreError);

/// Periodic collector over a fixed entity set.
///
/// Two states: idle and running. At most one background loop exists at a
/// time; the loop observes the stop signal at its boundary, so [`stop`]
/// blocks until the in-flight cycle and sleep complete but never truncates
/// a cycle mid-way.
///
/// [`stop`]: Collector::stop
pub struct Collector {
    store: Store,
    entities: EntityConfig,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Collector {
    /// Default interval between collection cycles.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

    pub fn new(store: Store, entities: EntityConfig) -> Self {
        Self {
            store,
            entities,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Runs one synchronous collection cycle on the caller's thread.
    ///
    /// # Errors
    ///
    /// Returns the first store failure; remaining entities of the cycle are
    /// skipped.
    pub fn run_one_cycle(&self) -> Result<(), CycleError> {
        collect_cycle(&self.store, &self.entities)
    }

    /// Starts the background collection loop.
    ///
    /// A no-op (with a warning) when the loop is already running or when
    /// `interval` is zero. A failed cycle is logged and the loop keeps
    /// going; the next cycle runs at the next interval tick.
    pub fn start(&mut self, interval: Duration) {
        if interval.is_zero() {
            warn!("ignoring start with zero interval");
            return;
        }

        if self.running.swap(true, Ordering::SeqCst) {
            warn!("collection loop is already running");
            return;
        }

        let store = self.store.clone();
        let entities = self.entities.clone();
        let running = Arc::clone(&self.running);
        self.handle = Some(thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match collect_cycle(&store, &entities) {
                    Ok(()) => debug!("collection cycle completed"),
                    Err(e) => error!("{e}"),
                }
                thread::sleep(interval);
            }
        }));

        info!(interval_secs = interval.as_secs_f64(), "collection started");
    }

    /// Stops the background loop, blocking until the current cycle/sleep
    /// completes and the thread exits. A no-op when idle.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("collection thread panicked");
            }
            info!("collection stopped");
        }
    }

    /// Whether the background loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The store this collector writes to.
    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// One full cycle: synthesize and persist readings for every configured
/// panel, the weather location, every household, and every battery, using
/// the current wall-clock hour as the diurnal input.
fn collect_cycle(store: &Store, entities: &EntityConfig) -> Result<(), CycleError> {
    let mut rng = StdRng::from_os_rng();
    let hour = Local::now().hour();

    for panel_id in &entities.panel_ids {
        store.insert(&Reading::Solar(solar_reading(&mut rng, panel_id, hour)))?;
    }

    store.insert(&Reading::Weather(weather_reading(
        &mut rng,
        &entities.location,
        hour,
    )))?;

    for household_id in &entities.household_ids {
        store.insert(&Reading::Consumption(consumption_reading(
            &mut rng,
            household_id,
            hour,
        )))?;
    }

    for battery_id in &entities.battery_ids {
        store.insert(&Reading::Battery(battery_reading(&mut rng, battery_id)))?;
    }

    Ok(())
}
