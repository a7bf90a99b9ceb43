//! Positioning algorithms

pub mod path_loss;
pub mod selection;
pub mod trilateration;

pub use path_loss::DistanceModel;
pub use selection::SelectionPolicy;
pub use trilateration::TrilaterationSolver;
