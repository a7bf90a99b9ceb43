//! Engine configuration
//!
//! All options are optional in JSON and fall back to the defaults below:
//!
//! ```json
//! { "referenceStrength": -40.0, "pathLossExponent": 2.0,
//!   "degeneracyTolerance": 1e-6, "selectionPolicy": "firstInserted" }
//! ```

use crate::algorithms::{DistanceModel, SelectionPolicy, TrilaterationSolver};
use crate::core::{DEFAULT_DEGENERACY_TOLERANCE, DEFAULT_PATH_LOSS_EXPONENT, DEFAULT_REFERENCE_STRENGTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Tunables of the positioning engine, fixed for the engine's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Signal strength at one distance unit (dBm)
    pub reference_strength: f64,
    /// Path-loss exponent of the distance model
    pub path_loss_exponent: f64,
    /// Determinant magnitude below which a solve is degenerate
    pub degeneracy_tolerance: f64,
    /// Which three readings are solved once more than three are known
    pub selection_policy: SelectionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_strength: DEFAULT_REFERENCE_STRENGTH,
            path_loss_exponent: DEFAULT_PATH_LOSS_EXPONENT,
            degeneracy_tolerance: DEFAULT_DEGENERACY_TOLERANCE,
            selection_policy: SelectionPolicy::default(),
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value} for `{parameter}`: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineConfig {
    pub fn with_reference_strength(mut self, reference_strength: f64) -> Self {
        self.reference_strength = reference_strength;
        self
    }

    pub fn with_path_loss_exponent(mut self, path_loss_exponent: f64) -> Self {
        self.path_loss_exponent = path_loss_exponent;
        self
    }

    pub fn with_degeneracy_tolerance(mut self, tolerance: f64) -> Self {
        self.degeneracy_tolerance = tolerance;
        self
    }

    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Check that every parameter yields a usable model
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.reference_strength.is_finite() {
            return Err(invalid(
                "referenceStrength",
                self.reference_strength,
                "Reference strength must be finite",
            ));
        }
        if !self.path_loss_exponent.is_finite() || self.path_loss_exponent <= 0.0 {
            return Err(invalid(
                "pathLossExponent",
                self.path_loss_exponent,
                "Path-loss exponent must be positive and finite",
            ));
        }
        if !self.degeneracy_tolerance.is_finite() || self.degeneracy_tolerance <= 0.0 {
            return Err(invalid(
                "degeneracyTolerance",
                self.degeneracy_tolerance,
                "Degeneracy tolerance must be positive and finite",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })
    }

    pub fn distance_model(&self) -> DistanceModel {
        DistanceModel::new(self.reference_strength, self.path_loss_exponent)
    }

    pub fn solver(&self) -> TrilaterationSolver {
        TrilaterationSolver::new(self.degeneracy_tolerance)
    }
}

fn invalid(parameter: &str, value: f64, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rssi_positioning_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.reference_strength, -40.0);
        assert_eq!(config.path_loss_exponent, 2.0);
        assert_eq!(config.degeneracy_tolerance, 1e-6);
        assert_eq!(config.selection_policy, SelectionPolicy::FirstInserted);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{"pathLossExponent": 3.0}"#).unwrap();
        assert_eq!(config.path_loss_exponent, 3.0);
        assert_eq!(config.reference_strength, -40.0);
        assert_eq!(config.degeneracy_tolerance, 1e-6);

        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_all_options() {
        let config = EngineConfig::from_json_str(
            r#"{"referenceStrength": -45.5, "pathLossExponent": 2.7,
                "degeneracyTolerance": 1e-9, "selectionPolicy": "maxSpread"}"#,
        )
        .unwrap();
        assert_eq!(config.reference_strength, -45.5);
        assert_eq!(config.path_loss_exponent, 2.7);
        assert_eq!(config.degeneracy_tolerance, 1e-9);
        assert_eq!(config.selection_policy, SelectionPolicy::MaxSpread);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = EngineConfig::from_json_str(r#"{"referenceStrenght": -40}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn test_invalid_values() {
        let config = EngineConfig::default().with_path_loss_exponent(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "pathLossExponent"
        ));

        let config = EngineConfig::default().with_degeneracy_tolerance(-1.0);
        assert!(config.validate().is_err());

        // zero would reduce the degeneracy check to an exact determinant test
        let config = EngineConfig::default().with_degeneracy_tolerance(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "degeneracyTolerance"
        ));
        assert!(EngineConfig::from_json_str(r#"{"degeneracyTolerance": 0.0}"#).is_err());

        let config = EngineConfig::default().with_reference_strength(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save_and_load");
        let config = EngineConfig::default()
            .with_reference_strength(-50.0)
            .with_selection_policy(SelectionPolicy::MaxSpread);

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load_from_file(temp_path("does_not_exist")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_derived_components() {
        let config = EngineConfig::default().with_degeneracy_tolerance(1e-3);
        assert_eq!(config.distance_model(), DistanceModel::default());
        assert_eq!(config.solver().degeneracy_tolerance, 1e-3);
    }
}
