//! Fixed-step integrators with zero-order-hold control.

use crate::error::{DynamicsFailure, DynamicsResult};
use crate::model::DynamicsModel;
use dip_core::SystemState;

/// Advance a state by one step of length `dt` under constant control `u`.
pub trait Integrator {
    fn step(
        &self,
        model: &DynamicsModel,
        x: &SystemState,
        u: f64,
        dt: f64,
    ) -> DynamicsResult<SystemState>;
}

/// Forward Euler (explicit, 1st order).
/// Calls the right-hand side once per step; the default for gain search.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step(
        &self,
        model: &DynamicsModel,
        x: &SystemState,
        u: f64,
        dt: f64,
    ) -> DynamicsResult<SystemState> {
        let xdot = model.compute_dynamics(x.as_slice(), u)?;
        Ok(x + xdot * dt)
    }
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Copy, Debug, Default)]
pub struct RK4;

impl Integrator for RK4 {
    fn step(
        &self,
        model: &DynamicsModel,
        x: &SystemState,
        u: f64,
        dt: f64,
    ) -> DynamicsResult<SystemState> {
        let k1 = model.compute_dynamics(x.as_slice(), u)?;

        let x2 = x + k1 * (0.5 * dt);
        let k2 = model.compute_dynamics(x2.as_slice(), u)?;

        let x3 = x + k2 * (0.5 * dt);
        let k3 = model.compute_dynamics(x3.as_slice(), u)?;

        let x4 = x + k3 * dt;
        let k4 = model.compute_dynamics(x4.as_slice(), u)?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        Ok(x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0))
    }
}

/// Integrator selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Forward Euler (1st-order, 1 rhs call per step).
    #[default]
    ForwardEuler,
    /// 4th-order Runge-Kutta (4 rhs calls per step).
    RK4,
}

impl IntegratorType {
    pub fn step(
        self,
        model: &DynamicsModel,
        x: &SystemState,
        u: f64,
        dt: f64,
    ) -> DynamicsResult<SystemState> {
        match self {
            IntegratorType::ForwardEuler => model.step_with(&ForwardEuler, x, u, dt),
            IntegratorType::RK4 => model.step_with(&RK4, x, u, dt),
        }
    }
}

impl std::str::FromStr for IntegratorType {
    type Err = DynamicsFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euler" | "forward_euler" => Ok(IntegratorType::ForwardEuler),
            "rk4" => Ok(IntegratorType::RK4),
            other => Err(DynamicsFailure::InvalidInput {
                what: format!("unknown integrator '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dip_plant::PlantConfiguration;

    #[test]
    fn euler_step_from_rest_with_force() {
        let model = DynamicsModel::new(PlantConfiguration::create_default()).unwrap();
        let x = SystemState::zeros();
        let next = ForwardEuler.step(&model, &x, 4.0, 0.01).unwrap();
        // One Euler step: positions unchanged, velocities pick up dt·acceleration.
        assert_eq!(next[0], 0.0);
        assert!(next[3] > 0.0);
    }

    #[test]
    fn rk4_moves_position_within_first_step() {
        let model = DynamicsModel::new(PlantConfiguration::create_default()).unwrap();
        let next = RK4.step(&model, &SystemState::zeros(), 4.0, 0.01).unwrap();
        assert!(next[0] > 0.0);
    }

    #[test]
    fn parse_integrator_type() {
        assert_eq!("rk4".parse::<IntegratorType>().unwrap(), IntegratorType::RK4);
        assert_eq!(
            "euler".parse::<IntegratorType>().unwrap(),
            IntegratorType::ForwardEuler
        );
        assert!("midpoint".parse::<IntegratorType>().is_err());
    }
}
