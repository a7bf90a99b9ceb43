//! Latest-reading store keyed by transmitter identifier
//!
//! Readings are kept in insertion order so that snapshots and solver selection
//! are deterministic for a given content. Overwriting an identifier keeps its
//! original slot. The store is guarded by a single `RwLock`: report delivery
//! takes the write lock, display and solve paths share the read lock.

use crate::algorithms::SelectionPolicy;
use crate::core::{Point2, Reading};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct StoreInner {
    readings: Vec<Reading>,
    index: HashMap<String, usize>,
}

/// Thread-safe map from transmitter identifier to its latest reading
#[derive(Debug, Default)]
pub struct ReadingStore {
    inner: RwLock<StoreInner>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the reading for `identifier`.
    ///
    /// Returns `true` if the identifier was not known before.
    pub fn upsert(&self, identifier: &str, position: Point2, distance: f64) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if let Some(&slot) = inner.index.get(identifier) {
            let reading = &mut inner.readings[slot];
            reading.position = position;
            reading.distance = distance;
            false
        } else {
            let slot = inner.readings.len();
            inner
                .readings
                .push(Reading::new(identifier, position, distance));
            inner.index.insert(identifier.to_string(), slot);
            true
        }
    }

    /// Number of distinct identifiers held
    pub fn len(&self) -> usize {
        self.inner.read().readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, identifier: &str) -> Option<Reading> {
        let inner = self.inner.read();
        inner
            .index
            .get(identifier)
            .map(|&slot| inner.readings[slot].clone())
    }

    /// All readings in insertion order
    pub fn snapshot(&self) -> Vec<Reading> {
        self.inner.read().readings.clone()
    }

    /// Up to three readings chosen by `policy`.
    ///
    /// Fewer than three are returned when the store cannot be solved yet.
    pub fn snapshot_for_solve(&self, policy: SelectionPolicy) -> Vec<Reading> {
        let inner = self.inner.read();
        policy.select(&inner.readings)
    }
}
