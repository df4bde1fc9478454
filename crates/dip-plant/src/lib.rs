//! dip-plant: physical parameters of the cart / double-pendulum plant.
//!
//! `PlantParams` is the raw, serializable form; `PlantConfiguration` is the
//! validated value object that every dynamics call shares read-only.

pub mod config;
pub mod error;
pub mod io;
pub mod mode;
pub mod params;
pub mod presets;

pub use config::PlantConfiguration;
pub use error::{ConfigResult, ConfigurationError, Violation};
pub use io::{load_file, load_json, load_yaml, save_json, save_yaml};
pub use mode::{DynamicsMode, MatrixCoupling};
pub use params::PlantParams;
pub use presets::{PRESET_NAMES, preset_names};
