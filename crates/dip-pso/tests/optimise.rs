//! End-to-end behavior of the swarm.

use dip_controllers::{ControllerKind, get_gain_bounds};
use dip_plant::PlantConfiguration;
use dip_pso::{
    Bounds, CostPolicy, EvaluationFailure, GainFitness, IterationProgress, Objective,
    PENALTY_COST, PsoConfig, PsoError, Termination, optimise, optimise_with_progress,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn sphere(g: &[f64]) -> Result<f64, EvaluationFailure> {
    Ok(g.iter().map(|x| (x - 1.0) * (x - 1.0)).sum())
}

fn seeded(seed: u64) -> PsoConfig {
    PsoConfig {
        n_particles: 15,
        max_iterations: 40,
        seed: Some(seed),
        target_cost: None,
        stagnation_window: None,
        ..PsoConfig::default()
    }
}

#[test]
fn same_seed_same_run() {
    let bounds = Bounds::new(vec![-5.0; 4], vec![5.0; 4]).unwrap();
    let a = optimise(&sphere, &bounds, &seeded(42)).unwrap();
    let b = optimise(&sphere, &bounds, &seeded(42)).unwrap();
    assert_eq!(a, b);

    let c = optimise(&sphere, &bounds, &seeded(43)).unwrap();
    assert_ne!(a.best_gains, c.best_gains);
}

#[test]
fn parallel_evaluation_matches_serial() {
    let bounds = Bounds::new(vec![-5.0; 3], vec![5.0; 3]).unwrap();
    let serial = optimise(&sphere, &bounds, &seeded(9)).unwrap();
    let parallel = optimise(
        &sphere,
        &bounds,
        &PsoConfig {
            parallel: true,
            ..seeded(9)
        },
    )
    .unwrap();
    assert_eq!(serial, parallel);
}

#[test]
fn converges_on_a_sphere() {
    let bounds = Bounds::new(vec![-5.0; 3], vec![5.0; 3]).unwrap();
    let config = PsoConfig {
        n_particles: 30,
        max_iterations: 200,
        seed: Some(1),
        ..PsoConfig::default()
    };
    let result = optimise(&sphere, &bounds, &config).unwrap();
    assert_eq!(result.termination, Termination::TargetReached);
    assert!(result.best_cost < 1e-6);
    for g in &result.best_gains {
        assert!((g - 1.0).abs() < 1e-2);
    }
}

#[test]
fn stagnation_stops_a_flat_objective() {
    let flat = |_: &[f64]| -> Result<f64, EvaluationFailure> { Ok(1.0) };
    let bounds = Bounds::new(vec![0.0; 2], vec![1.0; 2]).unwrap();
    let config = PsoConfig {
        stagnation_window: Some(5),
        seed: Some(3),
        ..PsoConfig::default()
    };
    let result = optimise(&flat, &bounds, &config).unwrap();
    assert_eq!(result.termination, Termination::Stagnated);
    assert_eq!(result.iterations, 5);
    assert_eq!(result.history, vec![1.0; 5]);
}

#[test]
fn lower_equal_upper_fails_before_any_evaluation() {
    let calls = AtomicUsize::new(0);
    let counting = |g: &[f64]| -> Result<f64, EvaluationFailure> {
        calls.fetch_add(1, Ordering::SeqCst);
        sphere(g)
    };

    let err = Bounds::new(vec![1.0, 1.0], vec![1.0, 1.0]).unwrap_err();
    assert!(matches!(err, PsoError::InvalidBounds { .. }));

    let bounds = Bounds::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
    let config = PsoConfig {
        n_particles: 0,
        ..PsoConfig::default()
    };
    let err = optimise(&counting, &bounds, &config).unwrap_err();
    assert!(matches!(err, PsoError::InvalidConfig { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn failing_candidates_are_penalized_not_fatal() {
    // Half the box fails outright.
    let picky = |g: &[f64]| -> Result<f64, EvaluationFailure> {
        if g[0] < 0.0 {
            Err(EvaluationFailure::InvalidGains {
                reason: "negative".into(),
            })
        } else {
            sphere(g)
        }
    };
    let bounds = Bounds::new(vec![-5.0; 2], vec![5.0; 2]).unwrap();
    let result = optimise(&picky, &bounds, &seeded(5)).unwrap();
    assert!(result.failed_evaluations > 0);
    assert!(result.best_cost < PENALTY_COST);
    assert!(result.best_gains[0] >= 0.0);
    assert_eq!(result.evaluations, 15 * 41);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn swarm_stays_in_bounds_and_history_is_monotone(
        seed in any::<u64>(),
        inertia in 0.0_f64..1.2,
        clamp in 0.05_f64..1.0,
    ) {
        let bounds = Bounds::new(vec![-2.0, 0.0, 10.0], vec![2.0, 1.0, 50.0]).unwrap();
        let config = PsoConfig {
            n_particles: 8,
            max_iterations: 15,
            inertia,
            velocity_clamp: Some(clamp),
            seed: Some(seed),
            target_cost: None,
            stagnation_window: None,
            ..PsoConfig::default()
        };

        let mut seen = 0;
        let mut violations = Vec::new();
        let mut check = |p: &IterationProgress<'_>| {
            seen += 1;
            for particle in p.particles {
                if !bounds.contains(&particle.position) {
                    violations.push(format!("position {:?}", particle.position));
                }
                for (i, v) in particle.velocity.iter().enumerate() {
                    if v.abs() > clamp * bounds.width(i) + 1e-12 {
                        violations.push(format!("velocity {v} in dim {i}"));
                    }
                }
            }
        };
        let result = optimise_with_progress(&sphere, &bounds, &config, Some(&mut check)).unwrap();

        prop_assert!(violations.is_empty(), "{:?}", violations);
        prop_assert_eq!(seen, 16);
        prop_assert_eq!(result.history.len(), 15);
        prop_assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
        prop_assert_eq!(*result.history.last().unwrap(), result.best_cost);
        prop_assert!(bounds.contains(&result.best_gains));
    }
}

#[test]
fn invalid_gains_cost_at_least_the_penalty() {
    let fitness = GainFitness::new(
        ControllerKind::SuperTwisting,
        PlantConfiguration::create_default(),
        CostPolicy::default(),
    )
    .unwrap();
    // K1 <= K2 is rejected before simulation.
    let err = fitness.evaluate(&[5.0, 50.0, 10.0, 10.0, 5.0, 5.0]).unwrap_err();
    assert!(matches!(err, EvaluationFailure::InvalidGains { .. }));
    assert!(fitness.penalty() >= PENALTY_COST);

    // The swarm sees the penalty, never an error.
    let bounds = Bounds::new(vec![1.0, 60.0, 1.0, 1.0, 1.0, 1.0], vec![50.0, 99.0, 2.0, 2.0, 2.0, 2.0])
        .unwrap();
    let config = PsoConfig {
        n_particles: 4,
        max_iterations: 2,
        seed: Some(0),
        ..PsoConfig::default()
    };
    let result = optimise(&fitness, &bounds, &config).unwrap();
    assert_eq!(result.failed_evaluations, result.evaluations);
    assert!(result.best_cost >= PENALTY_COST);
}

#[test]
fn tunes_classical_controller() {
    let fitness = GainFitness::new(
        ControllerKind::Classical,
        PlantConfiguration::create_default(),
        CostPolicy::default(),
    )
    .unwrap();
    let bounds = fitness.bounds().unwrap();
    let config = PsoConfig {
        n_particles: 20,
        max_iterations: 30,
        seed: Some(42),
        parallel: true,
        ..PsoConfig::default()
    };

    let result = optimise(&fitness, &bounds, &config).unwrap();

    assert!(result.iterations <= 30);
    assert_eq!(result.best_gains.len(), 6);
    assert!(result.best_cost >= 0.0);
    assert!(result.best_cost < PENALTY_COST);
    let (lo, hi) = get_gain_bounds(ControllerKind::Classical);
    for (i, g) in result.best_gains.iter().enumerate() {
        assert!(lo[i] <= *g && *g <= hi[i]);
    }
    assert_eq!(result.history.len(), result.iterations);
    assert!(fitness.model().get_computation_statistics().total > 0);
}
