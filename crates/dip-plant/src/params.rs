//! Raw plant parameters.

use serde::{Deserialize, Serialize};

/// Unvalidated plant parameters, as read from a file or a map.
///
/// Missing fields take the defaults below; unknown fields are rejected so a
/// misspelt key never silently falls back to a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantParams {
    /// Cart mass (kg).
    pub cart_mass: f64,
    /// Point mass at the tip of the first link (kg).
    pub pendulum1_mass: f64,
    /// Point mass at the tip of the second link (kg).
    pub pendulum2_mass: f64,
    /// First link length (m).
    pub pendulum1_length: f64,
    /// Second link length (m).
    pub pendulum2_length: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Viscous cart friction (N·s/m).
    pub friction_coefficient: f64,
    /// Viscous joint damping (N·m·s/rad).
    pub damping_coefficient: f64,
    /// Maximum actuator force magnitude (N).
    pub force_limit: f64,
    /// Maximum cart displacement from the origin (m).
    pub cart_position_limit: f64,
    /// Maximum cart speed (m/s).
    pub cart_velocity_limit: f64,
    /// Maximum joint rate (rad/s).
    pub joint_velocity_limit: f64,
    /// Relative integration accuracy tolerance carried with the configuration.
    pub integration_tolerance: f64,
    /// Mass matrices above this condition number are treated as singular.
    pub max_condition_number: f64,
    pub enable_linearization: bool,
    pub enable_small_angle_approximation: bool,
    pub enable_decoupled_dynamics: bool,
    pub enable_fast_math: bool,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            cart_mass: 1.0,
            pendulum1_mass: 0.1,
            pendulum2_mass: 0.1,
            pendulum1_length: 0.5,
            pendulum2_length: 0.5,
            gravity: 9.81,
            friction_coefficient: 0.1,
            damping_coefficient: 0.01,
            force_limit: 20.0,
            cart_position_limit: 5.0,
            cart_velocity_limit: 10.0,
            joint_velocity_limit: 50.0,
            integration_tolerance: 1e-6,
            max_condition_number: 1e12,
            enable_linearization: false,
            enable_small_angle_approximation: false,
            enable_decoupled_dynamics: false,
            enable_fast_math: false,
        }
    }
}
