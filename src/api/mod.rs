//! Engine entry points and output formatting

pub mod engine;
pub mod formatting;
pub mod types;

pub use engine::{EstimateCallback, ObserverHandle, PositioningEngine};
pub use formatting::{CsvFormatter, EstimateRecord, EventFormatter, JsonFormatter, TextFormatter};
pub use types::{EngineError, EngineResult, EngineStats, EstimateEvent, OutputFormat, SceneSnapshot};
