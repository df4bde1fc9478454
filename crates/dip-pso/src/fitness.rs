//! Closed-loop simulation cost of a controller gain vector.

use crate::bounds::Bounds;
use crate::error::{EvaluationFailure, PsoError};
use crate::objective::{Objective, PENALTY_COST};
use dip_controllers::{
    ControlError, Controller, ControllerKind, ControllerSettings, check_gains,
    create_controller_with_settings, get_gain_bounds,
};
use dip_core::{STATE_DIM, SystemState, THETA1, THETA2};
use dip_dynamics::{DynamicsModel, IntegratorType};
use dip_plant::PlantConfiguration;
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

/// Time grid and abort criteria of one closed-loop run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizon {
    pub dt: f64,
    pub steps: usize,
    pub integrator: IntegratorType,
    /// A run diverges once either link leans further than this (rad).
    pub angle_limit: f64,
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            dt: 0.01,
            steps: 500,
            integrator: IntegratorType::ForwardEuler,
            angle_limit: FRAC_PI_2,
        }
    }
}

impl Horizon {
    pub fn duration(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    fn divergence(&self, state: &SystemState) -> Option<(&'static str, f64)> {
        if let Some(v) = state.iter().find(|v| !v.is_finite()) {
            return Some(("state", *v));
        }
        if state[THETA1].abs() > self.angle_limit {
            return Some(("theta1", state[THETA1]));
        }
        if state[THETA2].abs() > self.angle_limit {
            return Some(("theta2", state[THETA2]));
        }
        None
    }
}

/// States and forces of one closed-loop run.
///
/// `states[k]` is the state at which `controls[k]` was computed; a complete
/// run has one more state than controls.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedLoopRecord {
    pub dt: f64,
    pub states: Vec<SystemState>,
    pub controls: Vec<f64>,
}

impl ClosedLoopRecord {
    fn start(x0: SystemState, dt: f64, steps: usize) -> Self {
        let mut states = Vec::with_capacity(steps + 1);
        states.push(x0);
        Self {
            dt,
            states,
            controls: Vec::with_capacity(steps),
        }
    }

    /// Number of completed steps.
    pub fn steps(&self) -> usize {
        self.controls.len()
    }

    pub fn duration(&self) -> f64 {
        self.steps() as f64 * self.dt
    }

    pub fn final_state(&self) -> &SystemState {
        // Never empty: `start` pushes the initial state.
        &self.states[self.states.len() - 1]
    }

    pub fn max_abs_angle(&self) -> f64 {
        self.states
            .iter()
            .map(|s| s[THETA1].abs().max(s[THETA2].abs()))
            .fold(0.0, f64::max)
    }

    pub fn max_abs_control(&self) -> f64 {
        self.controls.iter().map(|u| u.abs()).fold(0.0, f64::max)
    }
}

/// Run `controller` against `model` from `x0`.
///
/// The controller is reset first. Fails on the first dynamics failure or when
/// an angle leaves `horizon.angle_limit`.
pub fn simulate_closed_loop(
    model: &DynamicsModel,
    controller: &mut dyn Controller,
    x0: SystemState,
    horizon: &Horizon,
) -> Result<ClosedLoopRecord, EvaluationFailure> {
    match rollout(model, controller, x0, horizon) {
        (record, None) => Ok(record),
        (_, Some(failure)) => Err(failure),
    }
}

/// Like [`simulate_closed_loop`] but keeps the partial record on failure.
fn rollout(
    model: &DynamicsModel,
    controller: &mut dyn Controller,
    x0: SystemState,
    horizon: &Horizon,
) -> (ClosedLoopRecord, Option<EvaluationFailure>) {
    controller.reset();
    let mut record = ClosedLoopRecord::start(x0, horizon.dt, horizon.steps);
    let mut x = x0;

    for step in 0..horizon.steps {
        let u = controller.compute_control(&x);
        x = match horizon.integrator.step(model, &x, u, horizon.dt) {
            Ok(next) => next,
            Err(source) => return (record, Some(EvaluationFailure::Dynamics { step, source })),
        };
        record.controls.push(u);
        record.states.push(x);

        if let Some((quantity, value)) = horizon.divergence(&x) {
            let failure = EvaluationFailure::Diverged {
                step,
                quantity,
                value,
            };
            return (record, Some(failure));
        }
    }
    (record, None)
}

/// Scoring rule for a closed-loop run.
///
/// `cost = dt · Σ_k (Σ_i w_i·x_{k,i}² + λ·u_k²)`, averaged over the initial
/// states.
#[derive(Debug, Clone, PartialEq)]
pub struct CostPolicy {
    pub state_weights: [f64; STATE_DIM],
    pub control_weight: f64,
    pub horizon: Horizon,
    pub initial_states: Vec<SystemState>,
    /// Cost of a failed evaluation.
    pub penalty: f64,
    /// Cost per second of horizon lost to divergence. With `None` a diverged
    /// run is a failed evaluation and costs `penalty`.
    pub instability_penalty_rate: Option<f64>,
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self {
            state_weights: [1.0; STATE_DIM],
            control_weight: 0.1,
            horizon: Horizon::default(),
            initial_states: vec![
                SystemState::new(0.0, 0.05, -0.03, 0.0, 0.0, 0.0),
                SystemState::new(0.0, -0.1, 0.08, 0.0, 0.0, 0.0),
            ],
            penalty: PENALTY_COST,
            instability_penalty_rate: Some(1e3),
        }
    }
}

impl CostPolicy {
    pub fn validate(&self) -> Result<(), PsoError> {
        let invalid = |what: &str| -> Result<(), PsoError> {
            Err(PsoError::InvalidConfig {
                what: format!("cost policy: {what}"),
            })
        };
        let h = &self.horizon;

        if !(h.dt.is_finite() && h.dt > 0.0) {
            return invalid("dt must be positive");
        }
        if h.steps == 0 {
            return invalid("steps must be positive");
        }
        if h.angle_limit.is_nan() || h.angle_limit <= 0.0 {
            return invalid("angle_limit must be positive");
        }
        if self.initial_states.is_empty() {
            return invalid("at least one initial state is required");
        }
        if self
            .initial_states
            .iter()
            .any(|s| s.iter().any(|v| !v.is_finite()))
        {
            return invalid("initial states must be finite");
        }
        if self
            .state_weights
            .iter()
            .chain(std::iter::once(&self.control_weight))
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return invalid("weights must be finite and non-negative");
        }
        if !(self.penalty.is_finite() && self.penalty > 0.0) {
            return invalid("penalty must be positive and finite");
        }
        if let Some(rate) = self.instability_penalty_rate {
            if !rate.is_finite() || rate < 0.0 {
                return invalid("instability_penalty_rate must be finite and non-negative");
            }
        }
        Ok(())
    }

    pub fn stage_cost(&self, state: &SystemState, control: f64) -> f64 {
        let tracking: f64 = state
            .iter()
            .zip(&self.state_weights)
            .map(|(x, w)| w * x * x)
            .sum();
        tracking + self.control_weight * control * control
    }

    /// Integrated cost of the completed steps in `record`.
    pub fn trajectory_cost(&self, record: &ClosedLoopRecord) -> f64 {
        let sum: f64 = record
            .states
            .iter()
            .zip(&record.controls)
            .map(|(x, u)| self.stage_cost(x, *u))
            .sum();
        record.dt * sum
    }

    fn unfinished_time(&self, record: &ClosedLoopRecord) -> f64 {
        (self.horizon.steps - record.steps()) as f64 * self.horizon.dt
    }
}

/// Closed-loop fitness of gain vectors for one controller kind.
#[derive(Debug)]
pub struct GainFitness {
    kind: ControllerKind,
    model: DynamicsModel,
    policy: CostPolicy,
    settings: ControllerSettings,
}

impl GainFitness {
    pub fn new(
        kind: ControllerKind,
        plant: impl Into<Arc<PlantConfiguration>>,
        policy: CostPolicy,
    ) -> Result<Self, PsoError> {
        policy.validate()?;
        let model = DynamicsModel::new(plant).map_err(|e| PsoError::InvalidConfig {
            what: format!("dynamics model: {e}"),
        })?;
        let settings = ControllerSettings {
            dt: policy.horizon.dt,
            ..ControllerSettings::default()
        };
        Ok(Self {
            kind,
            model,
            policy,
            settings,
        })
    }

    /// Replace the untuned controller parameters. The controller period is
    /// tied to the simulation step and is not taken from `settings`.
    pub fn with_settings(mut self, settings: ControllerSettings) -> Self {
        self.settings = ControllerSettings {
            dt: self.policy.horizon.dt,
            ..settings
        };
        self
    }

    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    pub fn model(&self) -> &DynamicsModel {
        &self.model
    }

    pub fn policy(&self) -> &CostPolicy {
        &self.policy
    }

    /// The controller kind's search box.
    pub fn bounds(&self) -> Result<Bounds, PsoError> {
        let (lower, upper) = get_gain_bounds(self.kind);
        Bounds::new(lower, upper)
    }

    pub fn build_controller(&self, gains: &[f64]) -> Result<Box<dyn Controller>, EvaluationFailure> {
        if let Err(e) = check_gains(self.kind, gains) {
            let reason = match e {
                ControlError::InvalidGains { reason, .. } => reason,
                other => other.to_string(),
            };
            return Err(EvaluationFailure::InvalidGains { reason });
        }
        Ok(create_controller_with_settings(
            self.kind,
            gains,
            self.model.config(),
            &self.settings,
        )?)
    }

    /// Full records from every initial state, failing on divergence.
    pub fn simulate(&self, gains: &[f64]) -> Result<Vec<ClosedLoopRecord>, EvaluationFailure> {
        let mut controller = self.build_controller(gains)?;
        self.policy
            .initial_states
            .iter()
            .map(|x0| simulate_closed_loop(&self.model, controller.as_mut(), *x0, &self.policy.horizon))
            .collect()
    }
}

impl Objective for GainFitness {
    fn evaluate(&self, gains: &[f64]) -> Result<f64, EvaluationFailure> {
        let mut controller = self.build_controller(gains)?;
        let mut total = 0.0;

        for x0 in &self.policy.initial_states {
            let (record, failure) = rollout(&self.model, controller.as_mut(), *x0, &self.policy.horizon);
            let mut cost = self.policy.trajectory_cost(&record);
            if let Some(failure) = failure {
                match (failure.divergence_step(), self.policy.instability_penalty_rate) {
                    (Some(_), Some(rate)) => cost += rate * self.policy.unfinished_time(&record),
                    _ => return Err(failure),
                }
            }
            total += cost;
        }

        let mean = total / self.policy.initial_states.len() as f64;
        if mean.is_finite() {
            Ok(mean)
        } else {
            Err(EvaluationFailure::NonFiniteCost { value: mean })
        }
    }

    fn penalty(&self) -> f64 {
        self.policy.penalty
    }
}
