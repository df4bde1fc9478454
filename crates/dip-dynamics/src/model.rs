//! Validating dynamics façade used by simulations and fitness evaluation.

use crate::error::{DynamicsFailure, DynamicsResult};
use crate::integrator::{ForwardEuler, Integrator};
use crate::physics::{Equilibrium, LinearSystem, PhysicsComputer};
use crate::stats::{ComputationStatistics, StatsCounters};
use dip_core::{
    CART_POSITION, CART_VELOCITY, SystemState, THETA1_DOT, THETA2_DOT, state_from_slice,
};
use dip_plant::PlantConfiguration;
use nalgebra::{Matrix6, Vector6};
use std::sync::Arc;
use tracing::{debug, trace};

/// Dynamics model: input validation, physics delegation and bookkeeping.
///
/// Malformed input never panics; it comes back as a [`DynamicsFailure`]. The
/// statistics are atomic, so one model can serve concurrent evaluations.
#[derive(Debug)]
pub struct DynamicsModel {
    physics: PhysicsComputer,
    stats: StatsCounters,
}

impl DynamicsModel {
    pub fn new(config: impl Into<Arc<PlantConfiguration>>) -> DynamicsResult<Self> {
        let config = config.into();
        debug!(
            mode = %config.dynamics_mode(),
            coupling = %config.matrix_coupling(),
            "building dynamics model"
        );
        Ok(Self {
            physics: PhysicsComputer::new(config)?,
            stats: StatsCounters::new(),
        })
    }

    pub fn config(&self) -> &PlantConfiguration {
        self.physics.config()
    }

    pub fn physics(&self) -> &PhysicsComputer {
        &self.physics
    }

    /// State derivative for `state` (must hold exactly 6 finite values) and `control`.
    pub fn compute_dynamics(&self, state: &[f64], control: f64) -> DynamicsResult<SystemState> {
        let outcome = self
            .validate(state, control)
            .and_then(|s| self.physics.compute_dynamics_rhs(&s, control));
        self.stats.record(&outcome);
        if let Err(e) = &outcome {
            trace!(error = %e, "dynamics evaluation failed");
        }
        outcome
    }

    /// One explicit-Euler step.
    pub fn step(&self, state: &SystemState, control: f64, dt: f64) -> DynamicsResult<SystemState> {
        self.step_with(&ForwardEuler, state, control, dt)
    }

    /// One step with any integrator.
    pub fn step_with<I: Integrator>(
        &self,
        integrator: &I,
        state: &SystemState,
        control: f64,
        dt: f64,
    ) -> DynamicsResult<SystemState> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(DynamicsFailure::InvalidInput {
                what: format!("time step must be positive and finite, got {dt}"),
            });
        }
        integrator.step(self, state, control, dt)
    }

    /// `(A, B)` about the requested equilibrium.
    pub fn get_linearized_system(
        &self,
        equilibrium: Equilibrium,
    ) -> DynamicsResult<(Matrix6<f64>, Vector6<f64>)> {
        let LinearSystem { a, b } = self.physics.linearize(equilibrium)?;
        Ok((a, b))
    }

    pub fn get_computation_statistics(&self) -> ComputationStatistics {
        self.stats.snapshot()
    }

    fn validate(&self, state: &[f64], control: f64) -> DynamicsResult<SystemState> {
        let state = state_from_slice(state)?;
        let cfg = self.physics.config();

        if !control.is_finite() {
            return Err(DynamicsFailure::InvalidInput {
                what: format!("non-finite control {control}"),
            });
        }
        check_limit("control", control, cfg.force_limit())?;
        check_limit("cart position", state[CART_POSITION], cfg.cart_position_limit())?;
        check_limit("cart velocity", state[CART_VELOCITY], cfg.cart_velocity_limit())?;
        check_limit("joint 1 velocity", state[THETA1_DOT], cfg.joint_velocity_limit())?;
        check_limit("joint 2 velocity", state[THETA2_DOT], cfg.joint_velocity_limit())?;
        Ok(state)
    }
}

fn check_limit(quantity: &'static str, value: f64, limit: f64) -> DynamicsResult<()> {
    if value.abs() > limit {
        Err(DynamicsFailure::OutOfBounds {
            quantity,
            value: value.abs(),
            limit,
        })
    } else {
        Ok(())
    }
}
