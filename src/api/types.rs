//! Common API types and data structures

use crate::core::{PositionEstimate, Reading, Report};
use crate::processing::ParseError;
use crate::utils::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error types
///
/// Degenerate geometry and insufficient readings are not errors: they are
/// reported as [`PositionEstimate::Undefined`] and `None` respectively.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Payload could not be decoded into a report
    #[error("malformed report: {0}")]
    MalformedReport(#[from] ParseError),
    /// Invalid engine configuration
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Delivered to observers for every solve the engine performs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateEvent {
    /// Monotonic solve counter, starting at 1
    pub sequence: u64,
    pub estimate: PositionEstimate,
    /// Identifiers of the three readings that were solved, in solve order
    pub transmitters: Vec<String>,
    /// The report whose arrival triggered the solve
    pub trigger: Report,
}

/// Counters describing engine activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Reports passed to the engine, decoded or direct
    pub reports_received: u64,
    /// Payloads that failed to decode
    pub rejected_payloads: u64,
    /// Solves attempted (store held at least three readings)
    pub estimates_produced: u64,
    /// Solves that ended in degenerate geometry
    pub degenerate_solves: u64,
}

/// Everything a renderer needs to draw the current state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// All known transmitters in insertion order
    pub readings: Vec<Reading>,
    /// Most recent estimate, if a solve has happened
    pub estimate: Option<PositionEstimate>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable log lines
    #[default]
    Text,
    /// One JSON object per estimate
    Json,
    /// One CSV row per estimate
    Csv,
}
