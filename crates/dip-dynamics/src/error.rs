//! Failure categories reported by dynamics evaluations.

use dip_core::CoreError;
use thiserror::Error;

pub type DynamicsResult<T> = Result<T, DynamicsFailure>;

/// Coarse category of a [`DynamicsFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidInput,
    OutOfBounds,
    NumericalInstability,
}

/// Why a dynamics evaluation produced no derivative.
///
/// These are expected operating conditions during gain search, not bugs:
/// callers inspect [`DynamicsFailure::kind`] and decide how to penalize.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DynamicsFailure {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Out of bounds: |{quantity}| = {value} exceeds {limit}")]
    OutOfBounds {
        quantity: &'static str,
        value: f64,
        limit: f64,
    },

    #[error("Numerical instability: {what}")]
    NumericalInstability {
        what: String,
        condition_number: Option<f64>,
    },
}

impl DynamicsFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            DynamicsFailure::InvalidInput { .. } => FailureKind::InvalidInput,
            DynamicsFailure::OutOfBounds { .. } => FailureKind::OutOfBounds,
            DynamicsFailure::NumericalInstability { .. } => FailureKind::NumericalInstability,
        }
    }

    /// Malformed or out-of-range inputs, as opposed to ill-conditioned physics.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.kind(),
            FailureKind::InvalidInput | FailureKind::OutOfBounds
        )
    }
}

impl From<CoreError> for DynamicsFailure {
    fn from(e: CoreError) -> Self {
        DynamicsFailure::InvalidInput {
            what: e.to_string(),
        }
    }
}
