//! Stateless physics of the low-rank cart / double-pendulum model.
//!
//! Point masses sit at the tips of massless links; both angles are absolute
//! and measured from the upright vertical. The equations of motion are
//!
//! ```text
//! M(q) q̈ + C(q, q̇) q̇ + G(q) = B u,   q = [x, θ1, θ2],   B = [1, 0, 0]ᵀ
//! ```
//!
//! with cart friction and joint damping folded into the diagonal of `C`.

use crate::error::{DynamicsFailure, DynamicsResult};
use dip_core::{SystemState, THETA1, THETA2, assemble, velocities};
use dip_plant::{DynamicsMode, MatrixCoupling, PlantConfiguration};
use nalgebra::{Complex, Matrix3, Matrix6, Vector3, Vector6};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Reduced mass, damping/Coriolis and gravity terms at one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantMatrices {
    pub mass: Matrix3<f64>,
    pub damping: Matrix3<f64>,
    pub gravity: Vector3<f64>,
}

/// Kinetic and potential energy, split per body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBreakdown {
    pub cart_kinetic: f64,
    pub pendulum1_kinetic: f64,
    pub pendulum2_kinetic: f64,
    pub pendulum1_potential: f64,
    pub pendulum2_potential: f64,
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

/// Conditioning and energy diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityMetrics {
    pub condition_number: f64,
    pub determinant: f64,
    pub total_energy: f64,
    pub kinetic_potential_ratio: f64,
}

/// Equilibrium used for linearization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Equilibrium {
    /// Both links pointing up (θ1 = θ2 = 0).
    Upright,
    /// Both links hanging down (θ1 = θ2 = π).
    Downward,
}

impl Equilibrium {
    pub fn angle(self) -> f64 {
        match self {
            Equilibrium::Upright => 0.0,
            Equilibrium::Downward => PI,
        }
    }
}

impl FromStr for Equilibrium {
    type Err = DynamicsFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upright" => Ok(Equilibrium::Upright),
            "downward" => Ok(Equilibrium::Downward),
            other => Err(DynamicsFailure::InvalidInput {
                what: format!("unknown equilibrium '{other}' (expected upright or downward)"),
            }),
        }
    }
}

impl fmt::Display for Equilibrium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Equilibrium::Upright => f.write_str("upright"),
            Equilibrium::Downward => f.write_str("downward"),
        }
    }
}

/// `ẋ = A·x + B·u` about an equilibrium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSystem {
    pub a: Matrix6<f64>,
    pub b: Vector6<f64>,
}

impl LinearSystem {
    pub fn eigenvalues(&self) -> Vector6<Complex<f64>> {
        linear_eigenvalues(&self.a)
    }
}

/// Complex eigenvalues of a state matrix.
pub fn linear_eigenvalues(a: &Matrix6<f64>) -> Vector6<Complex<f64>> {
    a.complex_eigenvalues()
}

/// sin/cos terms, exact or small-angle.
struct Trig {
    s1: f64,
    c1: f64,
    s2: f64,
    c2: f64,
    s12: f64,
    c12: f64,
}

impl Trig {
    fn exact(t1: f64, t2: f64) -> Self {
        let (s1, c1) = t1.sin_cos();
        let (s2, c2) = t2.sin_cos();
        let (s12, c12) = (t1 - t2).sin_cos();
        Self {
            s1,
            c1,
            s2,
            c2,
            s12,
            c12,
        }
    }

    fn small_angle(t1: f64, t2: f64) -> Self {
        Self {
            s1: t1,
            c1: 1.0,
            s2: t2,
            c2: 1.0,
            s12: t1 - t2,
            c12: 1.0,
        }
    }
}

/// Pure dynamics computations for one plant configuration.
///
/// The approximation mode is fixed at construction; [`Self::compute_dynamics_rhs`]
/// is the single dispatch point.
#[derive(Debug, Clone)]
pub struct PhysicsComputer {
    config: Arc<PlantConfiguration>,
    mode: DynamicsMode,
    coupling: MatrixCoupling,
    upright: LinearSystem,
}

impl PhysicsComputer {
    pub fn new(config: Arc<PlantConfiguration>) -> DynamicsResult<Self> {
        let upright = linearize_about(&config, Equilibrium::Upright)?;
        Ok(Self {
            mode: config.dynamics_mode(),
            coupling: config.matrix_coupling(),
            config,
            upright,
        })
    }

    pub fn config(&self) -> &PlantConfiguration {
        &self.config
    }

    pub fn mode(&self) -> DynamicsMode {
        self.mode
    }

    pub fn coupling(&self) -> MatrixCoupling {
        self.coupling
    }

    /// State derivative `[ẋ, θ̇1, θ̇2, ẍ, θ̈1, θ̈2]`.
    ///
    /// The first three rows are the input velocities, copied, in every mode.
    pub fn compute_dynamics_rhs(
        &self,
        state: &SystemState,
        control: f64,
    ) -> DynamicsResult<SystemState> {
        let qdd = match self.mode {
            DynamicsMode::Linearized => self.linear_accelerations(state, control),
            DynamicsMode::SmallAngle | DynamicsMode::FullNonlinear => {
                self.nonlinear_accelerations(state, control)?
            }
        };
        if qdd.iter().any(|v| !v.is_finite()) {
            return Err(DynamicsFailure::NumericalInstability {
                what: "non-finite acceleration".to_string(),
                condition_number: None,
            });
        }
        Ok(assemble(&velocities(state), &qdd))
    }

    /// Reduced `(M, C, G)` at `state` under the configured mode and coupling.
    pub fn compute_matrices(&self, state: &SystemState) -> PlantMatrices {
        let trig = match self.mode {
            DynamicsMode::FullNonlinear => Trig::exact(state[THETA1], state[THETA2]),
            DynamicsMode::SmallAngle | DynamicsMode::Linearized => {
                Trig::small_angle(state[THETA1], state[THETA2])
            }
        };
        let matrices = coupled_matrices(&self.config, &trig, &velocities(state));
        match self.coupling {
            MatrixCoupling::Coupled => matrices,
            MatrixCoupling::Diagonal => PlantMatrices {
                mass: Matrix3::from_diagonal(&matrices.mass.diagonal()),
                damping: Matrix3::from_diagonal(&matrices.damping.diagonal()),
                gravity: matrices.gravity,
            },
        }
    }

    /// Exact energy decomposition; the potential datum is the cart rail.
    pub fn compute_energy(&self, state: &SystemState) -> EnergyBreakdown {
        let cfg = &self.config;
        let (m1, m2) = (cfg.pendulum1_mass(), cfg.pendulum2_mass());
        let (l1, l2) = (cfg.pendulum1_length(), cfg.pendulum2_length());
        let g = cfg.gravity();
        let trig = Trig::exact(state[THETA1], state[THETA2]);
        let v = velocities(state);
        let (xd, w1, w2) = (v[0], v[1], v[2]);

        let cart_kinetic = 0.5 * cfg.cart_mass() * xd * xd;

        let p1_vx = xd + l1 * trig.c1 * w1;
        let p1_vy = -l1 * trig.s1 * w1;
        let pendulum1_kinetic = 0.5 * m1 * (p1_vx * p1_vx + p1_vy * p1_vy);

        let p2_vx = p1_vx + l2 * trig.c2 * w2;
        let p2_vy = p1_vy - l2 * trig.s2 * w2;
        let pendulum2_kinetic = 0.5 * m2 * (p2_vx * p2_vx + p2_vy * p2_vy);

        let pendulum1_potential = m1 * g * l1 * trig.c1;
        let pendulum2_potential = m2 * g * (l1 * trig.c1 + l2 * trig.c2);

        let kinetic = cart_kinetic + pendulum1_kinetic + pendulum2_kinetic;
        let potential = pendulum1_potential + pendulum2_potential;

        EnergyBreakdown {
            cart_kinetic,
            pendulum1_kinetic,
            pendulum2_kinetic,
            pendulum1_potential,
            pendulum2_potential,
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }

    pub fn compute_stability_metrics(&self, state: &SystemState) -> StabilityMetrics {
        let mass = self.compute_matrices(state).mass;
        let energy = self.compute_energy(state);
        StabilityMetrics {
            condition_number: condition_number(&mass),
            determinant: mass.determinant(),
            total_energy: energy.total,
            kinetic_potential_ratio: energy.kinetic / energy.potential.abs().max(f64::EPSILON),
        }
    }

    /// Linearization about an equilibrium with the coupled mass matrix.
    pub fn linearize(&self, equilibrium: Equilibrium) -> DynamicsResult<LinearSystem> {
        match equilibrium {
            Equilibrium::Upright => Ok(self.upright),
            Equilibrium::Downward => linearize_about(&self.config, equilibrium),
        }
    }

    fn linear_accelerations(&self, state: &SystemState, control: f64) -> Vector3<f64> {
        let a = self.upright.a.fixed_rows::<3>(3);
        let b = self.upright.b.fixed_rows::<3>(3);
        a * state + b * control
    }

    fn nonlinear_accelerations(
        &self,
        state: &SystemState,
        control: f64,
    ) -> DynamicsResult<Vector3<f64>> {
        let PlantMatrices {
            mass,
            damping,
            gravity,
        } = self.compute_matrices(state);
        let rhs = Vector3::new(control, 0.0, 0.0) - damping * velocities(state) - gravity;

        if !self.config.fast_math() {
            let cond = condition_number(&mass);
            if !(cond <= self.config.max_condition_number()) {
                return Err(DynamicsFailure::NumericalInstability {
                    what: format!(
                        "mass matrix condition number {cond:.3e} exceeds {:.3e}",
                        self.config.max_condition_number()
                    ),
                    condition_number: Some(cond),
                });
            }
        }

        let chol = mass
            .cholesky()
            .ok_or_else(|| DynamicsFailure::NumericalInstability {
                what: "mass matrix is not positive definite".to_string(),
                condition_number: None,
            })?;
        Ok(chol.solve(&rhs))
    }
}

fn coupled_matrices(cfg: &PlantConfiguration, trig: &Trig, qdot: &Vector3<f64>) -> PlantMatrices {
    let (mc, m1, m2) = (cfg.cart_mass(), cfg.pendulum1_mass(), cfg.pendulum2_mass());
    let (l1, l2) = (cfg.pendulum1_length(), cfg.pendulum2_length());
    let g = cfg.gravity();
    let b = cfg.friction_coefficient();
    let d = cfg.damping_coefficient();
    let a = m1 + m2;
    let (w1, w2) = (qdot[1], qdot[2]);

    let m12 = a * l1 * trig.c1;
    let m13 = m2 * l2 * trig.c2;
    let m23 = m2 * l1 * l2 * trig.c12;
    let mass = Matrix3::new(
        mc + a, m12, m13, //
        m12, a * l1 * l1, m23, //
        m13, m23, m2 * l2 * l2,
    );

    let k = m2 * l1 * l2 * trig.s12;
    let damping = Matrix3::new(
        b, -a * l1 * trig.s1 * w1, -m2 * l2 * trig.s2 * w2, //
        0.0, d, k * w2, //
        0.0, -k * w1, d,
    );

    let gravity = Vector3::new(0.0, -a * g * l1 * trig.s1, -m2 * g * l2 * trig.s2);

    PlantMatrices {
        mass,
        damping,
        gravity,
    }
}

fn linearize_about(
    cfg: &PlantConfiguration,
    equilibrium: Equilibrium,
) -> DynamicsResult<LinearSystem> {
    let theta = equilibrium.angle();
    let trig = Trig::exact(theta, theta);
    let mass = coupled_matrices(cfg, &trig, &Vector3::zeros()).mass;

    let a = cfg.pendulum1_mass() + cfg.pendulum2_mass();
    let stiffness = Matrix3::from_diagonal(&Vector3::new(
        0.0,
        -a * cfg.gravity() * cfg.pendulum1_length() * trig.c1,
        -cfg.pendulum2_mass() * cfg.gravity() * cfg.pendulum2_length() * trig.c2,
    ));
    let dissipation = Matrix3::from_diagonal(&Vector3::new(
        cfg.friction_coefficient(),
        cfg.damping_coefficient(),
        cfg.damping_coefficient(),
    ));

    let mass_inv = mass
        .cholesky()
        .map(|c| c.inverse())
        .ok_or_else(|| DynamicsFailure::NumericalInstability {
            what: format!("{equilibrium} mass matrix is not positive definite"),
            condition_number: None,
        })?;

    let mut a_mat = Matrix6::zeros();
    a_mat
        .fixed_view_mut::<3, 3>(0, 3)
        .copy_from(&Matrix3::identity());
    a_mat
        .fixed_view_mut::<3, 3>(3, 0)
        .copy_from(&(-mass_inv * stiffness));
    a_mat
        .fixed_view_mut::<3, 3>(3, 3)
        .copy_from(&(-mass_inv * dissipation));

    let mut b_vec = Vector6::zeros();
    b_vec
        .fixed_rows_mut::<3>(3)
        .copy_from(&mass_inv.column(0));

    Ok(LinearSystem { a: a_mat, b: b_vec })
}

/// Ratio of extreme eigenvalues of a symmetric matrix; infinite if singular or indefinite.
fn condition_number(mass: &Matrix3<f64>) -> f64 {
    let eig = mass.symmetric_eigenvalues();
    let min = eig.min();
    let max = eig.max();
    if min <= 0.0 {
        f64::INFINITY
    } else {
        max / min
    }
}
