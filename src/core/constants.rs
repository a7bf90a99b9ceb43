//! Engine-wide constants for the path-loss model and the solver

/// Received signal strength at one distance unit from a transmitter (dBm)
pub const DEFAULT_REFERENCE_STRENGTH: f64 = -40.0;

/// Log-distance path-loss exponent (2.0 = free space)
pub const DEFAULT_PATH_LOSS_EXPONENT: f64 = 2.0;

/// Determinant magnitude below which a three-circle solve is degenerate
pub const DEFAULT_DEGENERACY_TOLERANCE: f64 = 1e-6;

/// Number of distinct transmitters needed before a solve is attempted
pub const MIN_READINGS_FOR_SOLVE: usize = 3;
