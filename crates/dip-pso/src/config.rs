//! Swarm hyper-parameters.

use crate::error::PsoError;

/// PSO configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PsoConfig {
    /// Swarm size
    pub n_particles: usize,
    /// Upper bound on velocity/position updates
    pub max_iterations: usize,
    /// Inertia weight `w`
    pub inertia: f64,
    /// Pull toward the personal best (`c1`)
    pub cognitive: f64,
    /// Pull toward the global best (`c2`)
    pub social: f64,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Stop once the global best drops below this
    pub target_cost: Option<f64>,
    /// Stop after this many iterations without strict improvement
    pub stagnation_window: Option<usize>,
    /// Velocity limit as a fraction of each dimension's width
    pub velocity_clamp: Option<f64>,
    /// Evaluate a pass on the rayon pool
    pub parallel: bool,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            n_particles: 30,
            max_iterations: 100,
            inertia: 0.7,
            cognitive: 1.5,
            social: 1.5,
            seed: None,
            target_cost: Some(1e-6),
            stagnation_window: Some(50),
            velocity_clamp: Some(0.2),
            parallel: false,
        }
    }
}

impl PsoConfig {
    pub fn validate(&self) -> Result<(), PsoError> {
        let invalid = |what: &str| -> Result<(), PsoError> {
            Err(PsoError::InvalidConfig {
                what: what.to_string(),
            })
        };

        if self.n_particles == 0 {
            return invalid("n_particles must be positive");
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be positive");
        }
        for (name, v) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(PsoError::InvalidConfig {
                    what: format!("{name} must be finite and non-negative, got {v}"),
                });
            }
        }
        if let Some(t) = self.target_cost {
            if t.is_nan() {
                return invalid("target_cost is NaN");
            }
        }
        if self.stagnation_window == Some(0) {
            return invalid("stagnation_window must be positive");
        }
        if let Some(c) = self.velocity_clamp {
            if !c.is_finite() || c <= 0.0 {
                return invalid("velocity_clamp must be positive");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(PsoConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_counts_are_rejected() {
        let c = PsoConfig {
            n_particles: 0,
            ..PsoConfig::default()
        };
        assert!(c.validate().is_err());
        let c = PsoConfig {
            max_iterations: 0,
            ..PsoConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn negative_coefficients_are_rejected() {
        let c = PsoConfig {
            social: -0.1,
            ..PsoConfig::default()
        };
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("social"));
    }
}
