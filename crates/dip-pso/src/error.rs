//! Error types for the swarm and its fitness evaluations.

use dip_controllers::ControlError;
use dip_dynamics::DynamicsFailure;
use thiserror::Error;

/// Bad optimizer input. Raised before any fitness evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PsoError {
    #[error("Invalid bounds: {what}")]
    InvalidBounds { what: String },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },
}

/// Why one candidate produced no cost.
///
/// Kept inspectable up to the swarm update, where it becomes the objective's
/// penalty.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationFailure {
    #[error("Gains rejected: {reason}")]
    InvalidGains { reason: String },

    #[error("Controller construction failed: {0}")]
    Controller(#[from] ControlError),

    #[error("Dynamics failed at step {step}: {source}")]
    Dynamics {
        step: usize,
        #[source]
        source: DynamicsFailure,
    },

    #[error("Diverged at step {step}: |{quantity}| = {value}")]
    Diverged {
        step: usize,
        quantity: &'static str,
        value: f64,
    },

    #[error("Non-finite cost: {value}")]
    NonFiniteCost { value: f64 },
}

impl EvaluationFailure {
    /// Step at which a simulation stopped early, for divergence-type failures.
    ///
    /// Out-of-bounds dynamics count as divergence: the closed loop drove the
    /// plant past its state limits.
    pub fn divergence_step(&self) -> Option<usize> {
        match self {
            EvaluationFailure::Diverged { step, .. } => Some(*step),
            EvaluationFailure::Dynamics {
                step,
                source: DynamicsFailure::OutOfBounds { .. },
            } => Some(*step),
            _ => None,
        }
    }
}
