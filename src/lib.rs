//! Signal-Strength Positioning Engine
//!
//! Estimates the 2D position of a receiver from periodic signal-strength
//! reports of fixed transmitters: each report is converted to a distance with
//! a log-distance path-loss model, kept as the transmitter's latest reading,
//! and three readings are trilaterated into a position estimate.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod utils;
pub mod api;
pub mod simulation;

// Re-export commonly used types
pub use crate::core::{Point2, PositionEstimate, Reading, Report};
pub use algorithms::{DistanceModel, SelectionPolicy, TrilaterationSolver};
pub use processing::{ParseError, ReadingStore, ReportParser};
pub use utils::{ConfigError, EngineConfig};
pub use api::{
    EngineError, EngineResult, EngineStats, EstimateEvent, EventFormatter, ObserverHandle,
    OutputFormat, PositioningEngine, SceneSnapshot,
};
pub use simulation::SimulatedTransmitter;
