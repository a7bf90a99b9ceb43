//! Choice of the three readings handed to the solver
//!
//! Both policies are deterministic for a given store content. `FirstInserted`
//! reproduces the reference behavior and ignores any fourth or later
//! transmitter. `MaxSpread` looks at every triple and keeps the one spanning
//! the largest triangle, which keeps the linear system away from the
//! degenerate case when more than three transmitters are known.

use crate::core::{Reading, MIN_READINGS_FOR_SOLVE};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Policy used by the reading store to pick the readings for a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPolicy {
    /// First three readings in insertion order
    #[default]
    FirstInserted,
    /// Triple with the largest triangle area, earliest triple on ties
    MaxSpread,
}

impl SelectionPolicy {
    /// Select up to three readings from `readings` (given in insertion order).
    ///
    /// Fewer than three readings are returned unchanged.
    pub fn select(&self, readings: &[Reading]) -> Vec<Reading> {
        if readings.len() <= MIN_READINGS_FOR_SOLVE {
            return readings.to_vec();
        }

        match self {
            SelectionPolicy::FirstInserted => readings[..MIN_READINGS_FOR_SOLVE].to_vec(),
            SelectionPolicy::MaxSpread => {
                let [i, j, k] = widest_triple(readings);
                vec![readings[i].clone(), readings[j].clone(), readings[k].clone()]
            }
        }
    }
}

/// Twice the area of the triangle spanned by three readings
fn doubled_area(a: &Reading, b: &Reading, c: &Reading) -> f64 {
    let ab = Vector2::new(b.position.x - a.position.x, b.position.y - a.position.y);
    let ac = Vector2::new(c.position.x - a.position.x, c.position.y - a.position.y);
    ab.perp(&ac).abs()
}

fn widest_triple(readings: &[Reading]) -> [usize; 3] {
    let n = readings.len();
    let mut best = [0, 1, 2];
    let mut best_area = f64::NEG_INFINITY;

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let area = doubled_area(&readings[i], &readings[j], &readings[k]);
                // strict comparison keeps the earliest triple on ties; NaN never wins
                if area.is_finite() && area > best_area {
                    best_area = area;
                    best = [i, j, k];
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2;

    fn reading(id: &str, x: f64, y: f64) -> Reading {
        Reading::new(id, Point2::new(x, y), 10.0)
    }

    fn ids(readings: &[Reading]) -> Vec<&str> {
        readings.iter().map(|r| r.identifier.as_str()).collect()
    }

    #[test]
    fn test_fewer_than_three_returned_as_is() {
        let readings = vec![reading("a", 0.0, 0.0), reading("b", 1.0, 0.0)];
        for policy in [SelectionPolicy::FirstInserted, SelectionPolicy::MaxSpread] {
            assert_eq!(ids(&policy.select(&readings)), vec!["a", "b"]);
        }
    }

    #[test]
    fn test_first_inserted_takes_prefix() {
        let readings = vec![
            reading("a", 0.0, 0.0),
            reading("b", 1.0, 0.0),
            reading("c", 2.0, 0.0),
            reading("d", 0.0, 100.0),
        ];
        let selected = SelectionPolicy::FirstInserted.select(&readings);
        assert_eq!(ids(&selected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_max_spread_avoids_collinear_prefix() {
        let readings = vec![
            reading("a", 0.0, 0.0),
            reading("b", 50.0, 0.0),
            reading("c", 100.0, 0.0),
            reading("d", 0.0, 100.0),
        ];
        let selected = SelectionPolicy::MaxSpread.select(&readings);
        assert_eq!(ids(&selected), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_max_spread_ties_prefer_earliest() {
        // unit square: every triple has the same area
        let readings = vec![
            reading("a", 0.0, 0.0),
            reading("b", 1.0, 0.0),
            reading("c", 1.0, 1.0),
            reading("d", 0.0, 1.0),
        ];
        let selected = SelectionPolicy::MaxSpread.select(&readings);
        assert_eq!(ids(&selected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_max_spread_skips_nan_positions() {
        let readings = vec![
            reading("a", f64::NAN, 0.0),
            reading("b", 0.0, 0.0),
            reading("c", 10.0, 0.0),
            reading("d", 0.0, 10.0),
        ];
        let selected = SelectionPolicy::MaxSpread.select(&readings);
        assert_eq!(ids(&selected), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(serde_json::to_string(&SelectionPolicy::MaxSpread).unwrap(), "\"maxSpread\"");
        let policy: SelectionPolicy = serde_json::from_str("\"firstInserted\"").unwrap();
        assert_eq!(policy, SelectionPolicy::FirstInserted);
    }
}
