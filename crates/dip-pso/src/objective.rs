//! The cost function seen by the swarm.

use crate::error::EvaluationFailure;

/// Cost assigned to a candidate whose evaluation failed.
pub const PENALTY_COST: f64 = 1e6;

/// Scalar cost over a gain vector; lower is better.
///
/// Must be free of shared mutable state beyond atomics: a pass may be
/// evaluated concurrently.
pub trait Objective: Sync {
    fn evaluate(&self, gains: &[f64]) -> Result<f64, EvaluationFailure>;

    /// Cost substituted for failed, NaN or negative evaluations.
    fn penalty(&self) -> f64 {
        PENALTY_COST
    }
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> Result<f64, EvaluationFailure> + Sync,
{
    fn evaluate(&self, gains: &[f64]) -> Result<f64, EvaluationFailure> {
        self(gains)
    }
}

/// Outcome of one evaluation at the swarm boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scored {
    pub cost: f64,
    pub penalized: bool,
}

/// Collapse a fallible evaluation to a usable cost.
pub(crate) fn score<O: Objective + ?Sized>(objective: &O, gains: &[f64]) -> Scored {
    let penalty = objective.penalty();
    match objective.evaluate(gains) {
        Ok(cost) if cost.is_finite() && cost >= 0.0 => Scored {
            cost,
            penalized: false,
        },
        Ok(cost) => {
            tracing::debug!(cost, "objective returned an unusable cost");
            Scored {
                cost: penalty,
                penalized: true,
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "evaluation penalized");
            Scored {
                cost: penalty,
                penalized: true,
            }
        }
    }
}
