//! Low-rank dynamics of the double inverted pendulum on a cart.
//!
//! Provides:
//! - `PhysicsComputer`: pure right-hand side, reduced `(M, C, G)` matrices,
//!   energy and conditioning diagnostics, equilibrium linearization
//! - `DynamicsModel`: validating façade with thread-safe computation statistics
//! - Fixed-step forward Euler and RK4 integrators

pub mod error;
pub mod integrator;
pub mod model;
pub mod physics;
pub mod stats;

pub use error::{DynamicsFailure, DynamicsResult, FailureKind};
pub use integrator::{ForwardEuler, Integrator, IntegratorType, RK4};
pub use model::DynamicsModel;
pub use physics::{
    EnergyBreakdown, Equilibrium, LinearSystem, PhysicsComputer, PlantMatrices, StabilityMetrics,
    linear_eigenvalues,
};
pub use stats::ComputationStatistics;
