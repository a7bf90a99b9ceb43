//! Closed-form 2D trilateration from exactly three range readings
//!
//! Subtracting the circle equations pairwise (1-2 and 2-3) removes the
//! quadratic terms and leaves a 2x2 linear system in `(x, y)`:
//!
//! ```text
//! | A  B | |x|   |C|
//! | D  E | |y| = |F|
//! ```
//!
//! which is solved with Cramer's rule. The point is not refined against the
//! residuals of the three circles.

use crate::core::{PositionEstimate, Reading, DEFAULT_DEGENERACY_TOLERANCE};
use nalgebra::{Matrix2, Vector2};
use tracing::debug;

/// Stateless three-circle solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrilaterationSolver {
    /// Determinant magnitude below which the geometry is treated as degenerate
    pub degeneracy_tolerance: f64,
}

impl Default for TrilaterationSolver {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: DEFAULT_DEGENERACY_TOLERANCE,
        }
    }
}

impl TrilaterationSolver {
    pub fn new(degeneracy_tolerance: f64) -> Self {
        Self { degeneracy_tolerance }
    }

    /// Solve for the receiver position given three readings.
    ///
    /// Returns [`PositionEstimate::Undefined`] when the transmitters are
    /// collinear or coincident within tolerance. `NaN` inputs are not
    /// checked and flow through to `NaN` coordinates.
    pub fn solve(&self, r1: &Reading, r2: &Reading, r3: &Reading) -> PositionEstimate {
        let (x1, y1, d1) = (r1.position.x, r1.position.y, r1.distance);
        let (x2, y2, d2) = (r2.position.x, r2.position.y, r2.distance);
        let (x3, y3, d3) = (r3.position.x, r3.position.y, r3.distance);

        let coefficients = Matrix2::new(
            2.0 * (x2 - x1), 2.0 * (y2 - y1),
            2.0 * (x3 - x2), 2.0 * (y3 - y2),
        );
        let rhs = Vector2::new(
            d1 * d1 - d2 * d2 - x1 * x1 + x2 * x2 - y1 * y1 + y2 * y2,
            d2 * d2 - d3 * d3 - x2 * x2 + x3 * x3 - y2 * y2 + y3 * y3,
        );

        let denominator = coefficients.determinant();
        if denominator.abs() < self.degeneracy_tolerance {
            debug!(
                ids = ?[&r1.identifier, &r2.identifier, &r3.identifier],
                denominator,
                "degenerate transmitter geometry"
            );
            return PositionEstimate::Undefined;
        }

        let (a, b) = (coefficients[(0, 0)], coefficients[(0, 1)]);
        let (d, e) = (coefficients[(1, 0)], coefficients[(1, 1)]);
        let (c, f) = (rhs[0], rhs[1]);

        let x = (c * e - f * b) / denominator;
        let y = (a * f - d * c) / denominator;
        PositionEstimate::located(x, y)
    }

    /// Solve from a slice, if it holds exactly three readings
    pub fn solve_slice(&self, readings: &[Reading]) -> Option<PositionEstimate> {
        match readings {
            [r1, r2, r3] => Some(self.solve(r1, r2, r3)),
            _ => None,
        }
    }
}
