//! Positioning engine
//!
//! Single entry point for decoded reports. Each report is converted to a
//! distance, stored as the latest reading of its transmitter and, once three
//! or more transmitters are known, the selected readings are solved and the
//! estimate is pushed to registered observers.
//!
//! All methods take `&self`; the engine can be shared through `Arc` between
//! the thread delivering reports and any number of display readers.

use crate::algorithms::{DistanceModel, TrilaterationSolver};
use crate::api::types::{EngineResult, EngineStats, EstimateEvent, SceneSnapshot};
use crate::core::{Point2, PositionEstimate, Reading, Report, MIN_READINGS_FOR_SOLVE};
use crate::processing::{ReadingStore, ReportParser};
use crate::utils::EngineConfig;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Callback function type for estimate updates
pub type EstimateCallback = Box<dyn Fn(&EstimateEvent) + Send + Sync>;

/// Observer registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverHandle(u32);

impl ObserverHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

#[derive(Default)]
struct Observers {
    counter: u32,
    callbacks: BTreeMap<ObserverHandle, EstimateCallback>,
}

/// Device positioning engine
pub struct PositioningEngine {
    config: EngineConfig,
    model: DistanceModel,
    solver: TrilaterationSolver,
    parser: ReportParser,
    store: Arc<ReadingStore>,
    latest: RwLock<Option<EstimateEvent>>,
    stats: Mutex<EngineStats>,
    observers: RwLock<Observers>,
}

impl PositioningEngine {
    /// Create an engine after validating `config`
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            model: config.distance_model(),
            solver: config.solver(),
            config,
            parser: ReportParser::new(),
            store: Arc::new(ReadingStore::new()),
            latest: RwLock::new(None),
            stats: Mutex::new(EngineStats::default()),
            observers: RwLock::new(Observers::default()),
        }
    }

    /// Replace the payload decoder
    pub fn with_parser(mut self, parser: ReportParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle one decoded report.
    ///
    /// Returns `None` while fewer than three transmitters are known, otherwise
    /// the estimate computed from the selected readings.
    pub fn on_report(&self, identifier: &str, position: Point2, rssi: f64) -> Option<PositionEstimate> {
        self.stats.lock().reports_received += 1;

        let distance = self.model.estimate_distance(rssi);
        debug!(identifier, x = position.x, y = position.y, rssi, distance, "report received");
        self.store.upsert(identifier, position, distance);

        let selected = self.store.snapshot_for_solve(self.config.selection_policy);
        if selected.len() < MIN_READINGS_FOR_SOLVE {
            debug!(known = selected.len(), "waiting for more transmitters");
            return None;
        }

        let estimate = self.solver.solve_slice(&selected)?;
        let sequence = {
            let mut stats = self.stats.lock();
            stats.estimates_produced += 1;
            if estimate.is_undefined() {
                stats.degenerate_solves += 1;
            }
            stats.estimates_produced
        };

        match estimate {
            PositionEstimate::Located { x, y } => info!(sequence, x, y, "position estimated"),
            PositionEstimate::Undefined => info!(sequence, "position undefined: degenerate geometry"),
        }

        let event = EstimateEvent {
            sequence,
            estimate,
            transmitters: selected.into_iter().map(|r| r.identifier).collect(),
            trigger: Report {
                identifier: identifier.to_string(),
                position,
                rssi,
            },
        };
        *self.latest.write() = Some(event.clone());
        self.notify(&event);

        Some(estimate)
    }

    /// Handle an already-decoded [`Report`]
    pub fn submit(&self, report: &Report) -> Option<PositionEstimate> {
        self.on_report(&report.identifier, report.position, report.rssi)
    }

    /// Decode a raw payload with the engine's parser without handling it.
    ///
    /// Failures are counted as rejected payloads.
    pub fn decode(&self, payload: &str) -> EngineResult<Report> {
        self.parser.parse(payload).map_err(|e| {
            self.stats.lock().rejected_payloads += 1;
            warn!(error = %e, "rejected payload");
            e.into()
        })
    }

    /// Decode a raw payload and handle it as a report
    pub fn on_payload(&self, payload: &str) -> EngineResult<Option<PositionEstimate>> {
        let report = self.decode(payload)?;
        Ok(self.submit(&report))
    }

    /// Register an observer for estimate events.
    ///
    /// Callbacks run on the reporting thread and must not (un)register observers.
    pub fn subscribe(&self, callback: EstimateCallback) -> ObserverHandle {
        let mut observers = self.observers.write();
        observers.counter += 1;
        let handle = ObserverHandle(observers.counter);
        observers.callbacks.insert(handle, callback);
        handle
    }

    /// Remove an observer. Returns `false` for an unknown handle.
    pub fn unsubscribe(&self, handle: ObserverHandle) -> bool {
        self.observers.write().callbacks.remove(&handle).is_some()
    }

    fn notify(&self, event: &EstimateEvent) {
        for callback in self.observers.read().callbacks.values() {
            callback(event);
        }
    }

    /// Number of distinct transmitters known
    pub fn store_size(&self) -> usize {
        self.store.len()
    }

    /// All current readings in insertion order
    pub fn readings(&self) -> Vec<Reading> {
        self.store.snapshot()
    }

    /// Shared handle to the reading store for display threads
    pub fn store(&self) -> Arc<ReadingStore> {
        Arc::clone(&self.store)
    }

    pub fn latest_estimate(&self) -> Option<PositionEstimate> {
        self.latest.read().as_ref().map(|event| event.estimate)
    }

    pub fn latest_event(&self) -> Option<EstimateEvent> {
        self.latest.read().clone()
    }

    /// Readings plus latest estimate, for renderers
    pub fn scene(&self) -> SceneSnapshot {
        SceneSnapshot {
            readings: self.readings(),
            estimate: self.latest_estimate(),
        }
    }

    pub fn stats(&self) -> EngineStats {
        *self.stats.lock()
    }
}

impl Default for PositioningEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}
