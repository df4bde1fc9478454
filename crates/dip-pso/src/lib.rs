//! dip-pso: particle swarm tuning of sliding-mode controller gains.
//!
//! The swarm minimizes an [`Objective`] over a box of gain vectors. The
//! standard objective, [`GainFitness`], builds a controller from each
//! candidate and scores a closed-loop simulation against the plant.
//!
//! Runs are synchronous (the global best moves once per pass) and fully
//! determined by the seed, whether or not evaluation is parallel.

pub mod bounds;
pub mod config;
pub mod error;
pub mod fitness;
pub mod objective;
pub mod optimiser;
pub mod swarm;

pub use bounds::Bounds;
pub use config::PsoConfig;
pub use error::{EvaluationFailure, PsoError};
pub use fitness::{ClosedLoopRecord, CostPolicy, GainFitness, Horizon, simulate_closed_loop};
pub use objective::{Objective, PENALTY_COST};
pub use optimiser::{IterationProgress, PsoResult, Termination, optimise, optimise_with_progress};
pub use swarm::{Particle, Swarm};
