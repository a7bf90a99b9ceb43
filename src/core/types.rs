//! Core data types for the positioning engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position in the planar unit system shared by transmitters and receiver
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Latest known state of one transmitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub identifier: String,
    pub position: Point2,
    /// Estimated distance to the receiver. `NaN` when the report was malformed.
    pub distance: f64,
}

impl Reading {
    pub fn new(identifier: impl Into<String>, position: Point2, distance: f64) -> Self {
        Self {
            identifier: identifier.into(),
            position,
            distance,
        }
    }
}

/// One decoded report as delivered by the transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub identifier: String,
    pub position: Point2,
    /// Received signal strength (dBm)
    pub rssi: f64,
}

/// Output of a trilateration solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PositionEstimate {
    /// Solved position. Coordinates are `NaN` if a `NaN` distance was propagated.
    Located { x: f64, y: f64 },
    /// Transmitter geometry was degenerate (collinear or coincident)
    Undefined,
}

impl PositionEstimate {
    pub fn located(x: f64, y: f64) -> Self {
        PositionEstimate::Located { x, y }
    }

    /// The solved point, if the geometry was not degenerate
    pub fn point(&self) -> Option<Point2> {
        match *self {
            PositionEstimate::Located { x, y } => Some(Point2::new(x, y)),
            PositionEstimate::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, PositionEstimate::Undefined)
    }

    /// True only for a located estimate with finite coordinates
    pub fn is_finite(&self) -> bool {
        self.point().map_or(false, |p| p.is_finite())
    }
}

impl fmt::Display for PositionEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionEstimate::Located { x, y } => write!(f, "({:.2}, {:.2})", x, y),
            PositionEstimate::Undefined => write!(f, "undefined"),
        }
    }
}
