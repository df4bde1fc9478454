//! The PSO driver loop.

use crate::bounds::Bounds;
use crate::config::PsoConfig;
use crate::error::PsoError;
use crate::objective::{Objective, Scored, score};
use crate::swarm::{Particle, Swarm};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, warn};

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Global best fell below `target_cost`.
    TargetReached,
    /// No strict improvement for `stagnation_window` iterations.
    Stagnated,
    MaxIterations,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Termination::TargetReached => "target reached",
            Termination::Stagnated => "stagnated",
            Termination::MaxIterations => "max iterations",
        })
    }
}

/// Outcome of [`optimise`].
#[derive(Debug, Clone, PartialEq)]
pub struct PsoResult {
    pub best_gains: Vec<f64>,
    pub best_cost: f64,
    /// `history[i]` is the global best after iteration `i + 1`.
    pub history: Vec<f64>,
    pub iterations: usize,
    pub termination: Termination,
    pub evaluations: usize,
    /// Evaluations that were replaced by the penalty cost.
    pub failed_evaluations: usize,
}

/// Snapshot handed to the progress callback after each evaluation pass.
///
/// Iteration 0 is the initial swarm.
#[derive(Debug)]
pub struct IterationProgress<'a> {
    pub iteration: usize,
    pub best_cost: f64,
    pub best_position: &'a [f64],
    pub mean_cost: f64,
    /// Penalized evaluations in this pass.
    pub failed: usize,
    pub particles: &'a [Particle],
}

pub fn optimise<O: Objective + ?Sized>(
    objective: &O,
    bounds: &Bounds,
    config: &PsoConfig,
) -> Result<PsoResult, PsoError> {
    optimise_with_progress(objective, bounds, config, None)
}

pub fn optimise_with_progress<O: Objective + ?Sized>(
    objective: &O,
    bounds: &Bounds,
    config: &PsoConfig,
    mut progress: Option<&mut dyn FnMut(&IterationProgress<'_>)>,
) -> Result<PsoResult, PsoError> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    info!(
        particles = config.n_particles,
        dimensions = bounds.dim(),
        max_iterations = config.max_iterations,
        seed = ?config.seed,
        parallel = config.parallel,
        "starting particle swarm"
    );

    let mut swarm = Swarm::new(bounds, config.n_particles, &mut rng);
    let mut evaluations = 0;
    let mut failed_evaluations = 0;

    let (costs, failed) = evaluate_pass(objective, &swarm, config.parallel);
    swarm.record_costs(&costs);
    evaluations += config.n_particles;
    failed_evaluations += failed;
    report(&swarm, failed, progress.as_deref_mut());

    let mut history = Vec::with_capacity(config.max_iterations);
    let mut since_improvement = 0;

    let termination = loop {
        if target_reached(config, swarm.global_best_cost) {
            break Termination::TargetReached;
        }
        if config
            .stagnation_window
            .is_some_and(|window| since_improvement >= window)
        {
            break Termination::Stagnated;
        }
        if swarm.iteration >= config.max_iterations {
            break Termination::MaxIterations;
        }

        swarm.advance(bounds, config, &mut rng);
        let (costs, failed) = evaluate_pass(objective, &swarm, config.parallel);
        let improved = swarm.record_costs(&costs);
        evaluations += config.n_particles;
        failed_evaluations += failed;

        history.push(swarm.global_best_cost);
        since_improvement = if improved { 0 } else { since_improvement + 1 };

        debug!(
            iteration = swarm.iteration,
            best = swarm.global_best_cost,
            mean = swarm.mean_cost(),
            failed,
            "swarm pass"
        );
        if failed * 2 > config.n_particles {
            warn!(
                iteration = swarm.iteration,
                failed,
                particles = config.n_particles,
                "most particles were penalized this pass"
            );
        }
        report(&swarm, failed, progress.as_deref_mut());
    };

    info!(
        best_cost = swarm.global_best_cost,
        iterations = swarm.iteration,
        evaluations,
        failed_evaluations,
        %termination,
        "particle swarm finished"
    );

    Ok(PsoResult {
        best_gains: swarm.global_best_position,
        best_cost: swarm.global_best_cost,
        history,
        iterations: swarm.iteration,
        termination,
        evaluations,
        failed_evaluations,
    })
}

fn target_reached(config: &PsoConfig, best: f64) -> bool {
    config.target_cost.is_some_and(|target| best < target)
}

/// Costs of every particle's current position, in particle order, and the
/// number of penalized evaluations.
fn evaluate_pass<O: Objective + ?Sized>(
    objective: &O,
    swarm: &Swarm,
    parallel: bool,
) -> (Vec<f64>, usize) {
    let scores: Vec<Scored> = if parallel {
        swarm
            .particles
            .par_iter()
            .map(|p| score(objective, &p.position))
            .collect()
    } else {
        swarm
            .particles
            .iter()
            .map(|p| score(objective, &p.position))
            .collect()
    };
    let failed = scores.iter().filter(|s| s.penalized).count();
    (scores.into_iter().map(|s| s.cost).collect(), failed)
}

fn report(
    swarm: &Swarm,
    failed: usize,
    progress: Option<&mut (dyn FnMut(&IterationProgress<'_>) + '_)>,
) {
    if let Some(callback) = progress {
        callback(&IterationProgress {
            iteration: swarm.iteration,
            best_cost: swarm.global_best_cost,
            best_position: &swarm.global_best_position,
            mean_cost: swarm.mean_cost(),
            failed,
            particles: &swarm.particles,
        });
    }
}
