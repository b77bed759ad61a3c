//! Keyed single-flight registry for pipeline runs.
//!
//! Every run registers under a [`ConcurrencyKey`] and gets a generation
//! number. Starting a newer run for the same key supersedes all older runs
//! that have not yet entered their publish step; they observe this at their
//! next [`RunGuard::checkpoint`] and stop without side effects. A run that has
//! entered its publish step is past the cancellation-safe point and finishes;
//! newer runs wait for it before publishing.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use shipgate_core::ConcurrencyKey;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("run {generation} for '{key}' was superseded by a newer run")]
pub struct Superseded {
    pub key: ConcurrencyKey,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Publishing,
}

#[derive(Debug, Default)]
struct KeyState {
    latest: u64,
    live: BTreeMap<u64, Phase>,
}

#[derive(Debug, Default)]
struct Shared {
    keys: Mutex<HashMap<ConcurrencyKey, KeyState>>,
    changed: Condvar,
}

#[derive(Debug, Clone, Default)]
pub struct RunRegistry {
    shared: Arc<Shared>,
}

impl RunRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ConcurrencyKey, KeyState>> {
        self.shared
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new run for `key`, superseding older runs that have not
    /// started publishing.
    #[must_use]
    pub fn begin(&self, key: ConcurrencyKey) -> RunGuard {
        let generation = {
            let mut keys = self.lock();
            let state = keys.entry(key.clone()).or_default();
            state.latest += 1;

            let superseded = state
                .live
                .values()
                .filter(|phase| **phase == Phase::Running)
                .count();
            if superseded > 0 {
                info!(%key, superseded, "superseding in-flight runs");
            }

            state.live.insert(state.latest, Phase::Running);
            state.latest
        };
        self.shared.changed.notify_all();

        debug!(%key, generation, "run registered");
        RunGuard {
            registry: self.clone(),
            key,
            generation,
        }
    }

    /// Number of registered runs for `key` that have not finished or
    /// acknowledged cancellation.
    #[must_use]
    pub fn live_runs(&self, key: &ConcurrencyKey) -> usize {
        self.lock().get(key).map_or(0, |state| state.live.len())
    }

    fn release(&self, key: &ConcurrencyKey, generation: u64) {
        {
            let mut keys = self.lock();
            // The entry is kept so generations stay monotonic per key.
            if let Some(state) = keys.get_mut(key) {
                state.live.remove(&generation);
            }
        }
        self.shared.changed.notify_all();
    }
}

/// Membership of one run in the registry; unregisters on drop.
#[derive(Debug)]
pub struct RunGuard {
    registry: RunRegistry,
    key: ConcurrencyKey,
    generation: u64,
}

impl RunGuard {
    #[must_use]
    pub fn key(&self) -> &ConcurrencyKey {
        &self.key
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn superseded(&self) -> Superseded {
        Superseded {
            key: self.key.clone(),
            generation: self.generation,
        }
    }

    #[must_use]
    pub fn is_superseded(&self) -> bool {
        let keys = self.registry.lock();
        keys.get(&self.key).is_some_and(|state| {
            state.latest > self.generation
                && state.live.get(&self.generation) != Some(&Phase::Publishing)
        })
    }

    /// Cancellation point. A superseded run is unregistered here so newer
    /// runs waiting to publish can proceed.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if a newer run for the same key has started.
    pub fn checkpoint(&self) -> Result<(), Superseded> {
        if self.is_superseded() {
            info!(key = %self.key, generation = self.generation, "run superseded");
            self.registry.release(&self.key, self.generation);
            return Err(self.superseded());
        }
        Ok(())
    }

    /// Moves the run past the cancellation-safe point.
    ///
    /// Blocks until every older run for the key has finished or acknowledged
    /// cancellation, so publishes for one key never overlap.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if a newer run started before this one could
    /// enter its publish step.
    pub fn enter_publish(&self) -> Result<(), Superseded> {
        let mut keys = self.registry.lock();
        loop {
            let Some(state) = keys.get_mut(&self.key) else {
                return Err(self.superseded());
            };
            if state.latest > self.generation || !state.live.contains_key(&self.generation) {
                drop(keys);
                info!(
                    key = %self.key,
                    generation = self.generation,
                    "run superseded before publish"
                );
                self.registry.release(&self.key, self.generation);
                return Err(self.superseded());
            }
            if state.live.range(..self.generation).next().is_none() {
                state.live.insert(self.generation, Phase::Publishing);
                debug!(key = %self.key, generation = self.generation, "entered publish");
                return Ok(());
            }
            debug!(key = %self.key, generation = self.generation, "waiting for older runs");
            keys = self
                .registry
                .shared
                .changed
                .wait(keys)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.registry.release(&self.key, self.generation);
    }
}
