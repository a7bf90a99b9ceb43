//! Log-distance path-loss model
//!
//! Converts a received signal strength into an estimated distance by inverting
//! `rssi = A - 10 * n * log10(d)`, where `A` is the strength observed at one
//! distance unit and `n` is the path-loss exponent.

use crate::core::{DEFAULT_PATH_LOSS_EXPONENT, DEFAULT_REFERENCE_STRENGTH};
use serde::{Deserialize, Serialize};

/// Signal strength to distance conversion with fixed model constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceModel {
    /// Signal strength at one distance unit (dBm)
    pub reference_strength: f64,
    /// Path-loss exponent
    pub path_loss_exponent: f64,
}

impl Default for DistanceModel {
    fn default() -> Self {
        Self {
            reference_strength: DEFAULT_REFERENCE_STRENGTH,
            path_loss_exponent: DEFAULT_PATH_LOSS_EXPONENT,
        }
    }
}

impl DistanceModel {
    pub fn new(reference_strength: f64, path_loss_exponent: f64) -> Self {
        Self {
            reference_strength,
            path_loss_exponent,
        }
    }

    /// Estimate distance from a signal strength sample.
    ///
    /// Total over finite inputs: no range check is applied. `NaN` propagates.
    pub fn estimate_distance(&self, rssi: f64) -> f64 {
        let exponent = (self.reference_strength - rssi) / (10.0 * self.path_loss_exponent);
        10.0_f64.powf(exponent)
    }

    /// Signal strength the model predicts at `distance`
    pub fn expected_rssi(&self, distance: f64) -> f64 {
        self.reference_strength - 10.0 * self.path_loss_exponent * distance.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_reference_strength_is_unit_distance() {
        let model = DistanceModel::default();
        assert_eq!(model.estimate_distance(-40.0), 1.0);
    }

    #[test]
    fn test_known_distances() {
        let model = DistanceModel::default();
        // 20 dB below reference with n = 2 is one decade further away
        assert_relative_eq!(model.estimate_distance(-60.0), 10.0, epsilon = 1e-12);
        assert_relative_eq!(model.estimate_distance(-80.0), 100.0, epsilon = 1e-9);
        assert_relative_eq!(model.estimate_distance(-20.0), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_constants() {
        let model = DistanceModel::new(-50.0, 3.0);
        assert_eq!(model.estimate_distance(-50.0), 1.0);
        assert_relative_eq!(model.estimate_distance(-80.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extreme_inputs() {
        let model = DistanceModel::default();
        assert_eq!(model.estimate_distance(f64::NEG_INFINITY), f64::INFINITY);
        assert_eq!(model.estimate_distance(f64::INFINITY), 0.0);
        assert!(model.estimate_distance(1000.0) >= 0.0);
        assert!(model.estimate_distance(-1000.0) > 1e40);
    }

    #[test]
    fn test_nan_propagates() {
        let model = DistanceModel::default();
        assert!(model.estimate_distance(f64::NAN).is_nan());
    }

    proptest! {
        #[test]
        fn prop_distance_non_negative(rssi in -500.0f64..500.0) {
            let model = DistanceModel::default();
            prop_assert!(model.estimate_distance(rssi) >= 0.0);
        }

        #[test]
        fn prop_stronger_signal_is_closer(rssi in -150.0f64..50.0, delta in 0.01f64..30.0) {
            let model = DistanceModel::default();
            prop_assert!(model.estimate_distance(rssi + delta) < model.estimate_distance(rssi));
        }

        #[test]
        fn prop_round_trip(distance in 0.01f64..10_000.0) {
            let model = DistanceModel::default();
            let rssi = model.expected_rssi(distance);
            let recovered = model.estimate_distance(rssi);
            prop_assert!((recovered - distance).abs() <= distance * 1e-9);
        }
    }
}
