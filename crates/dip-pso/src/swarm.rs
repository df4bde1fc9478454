//! Particle state and the synchronous velocity/position update.

use crate::bounds::Bounds;
use crate::config::PsoConfig;
use rand::Rng;

/// One candidate gain vector and its memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    /// Cost at `position` from the most recent evaluation.
    pub cost: f64,
    pub best_position: Vec<f64>,
    pub best_cost: f64,
}

impl Particle {
    fn at(position: Vec<f64>) -> Self {
        let dim = position.len();
        Self {
            best_position: position.clone(),
            position,
            velocity: vec![0.0; dim],
            cost: f64::INFINITY,
            best_cost: f64::INFINITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swarm {
    pub particles: Vec<Particle>,
    pub global_best_position: Vec<f64>,
    pub global_best_cost: f64,
    /// Completed velocity/position updates.
    pub iteration: usize,
}

impl Swarm {
    /// Positions uniform in `bounds`, velocities zero, nothing evaluated yet.
    pub fn new<R: Rng>(bounds: &Bounds, n_particles: usize, rng: &mut R) -> Self {
        let particles = (0..n_particles)
            .map(|_| {
                let position = (0..bounds.dim())
                    .map(|i| rng.gen_range(bounds.lower()[i]..=bounds.upper()[i]))
                    .collect();
                Particle::at(position)
            })
            .collect::<Vec<_>>();
        Self {
            global_best_position: particles
                .first()
                .map(|p| p.position.clone())
                .unwrap_or_default(),
            particles,
            global_best_cost: f64::INFINITY,
            iteration: 0,
        }
    }

    /// Move every particle one step.
    ///
    /// `r1` and `r2` are drawn per particle per dimension in that order, so a
    /// seeded generator gives the same trajectory on every run.
    pub fn advance<R: Rng>(&mut self, bounds: &Bounds, config: &PsoConfig, rng: &mut R) {
        let global = &self.global_best_position;
        for p in &mut self.particles {
            for i in 0..bounds.dim() {
                let r1: f64 = rng.r#gen();
                let r2: f64 = rng.r#gen();
                let x = p.position[i];
                let mut v = config.inertia * p.velocity[i]
                    + config.cognitive * r1 * (p.best_position[i] - x)
                    + config.social * r2 * (global[i] - x);
                if let Some(fraction) = config.velocity_clamp {
                    let vmax = fraction * bounds.width(i);
                    v = v.clamp(-vmax, vmax);
                }
                p.velocity[i] = v;
                p.position[i] = bounds.clamp(i, x + v);
            }
        }
        self.iteration += 1;
    }

    /// Store this pass's costs, then update personal and global bests.
    ///
    /// Bests move only on strict decrease. The global best is taken after all
    /// personal bests are updated. Returns whether it improved.
    pub fn record_costs(&mut self, costs: &[f64]) -> bool {
        for (p, &cost) in self.particles.iter_mut().zip(costs) {
            p.cost = cost;
            if cost < p.best_cost {
                p.best_cost = cost;
                p.best_position.clone_from(&p.position);
            }
        }

        let leader = self
            .particles
            .iter()
            .min_by(|a, b| a.best_cost.total_cmp(&b.best_cost));
        match leader {
            Some(p) if p.best_cost < self.global_best_cost => {
                self.global_best_cost = p.best_cost;
                self.global_best_position.clone_from(&p.best_position);
                true
            }
            _ => false,
        }
    }

    /// Mean of the current costs.
    pub fn mean_cost(&self) -> f64 {
        if self.particles.is_empty() {
            return f64::NAN;
        }
        self.particles.iter().map(|p| p.cost).sum::<f64>() / self.particles.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bounds() -> Bounds {
        Bounds::new(vec![-1.0, 0.0, 10.0], vec![1.0, 5.0, 20.0]).unwrap()
    }

    #[test]
    fn initial_swarm_is_inside_bounds_and_at_rest() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let swarm = Swarm::new(&bounds(), 50, &mut rng);
        assert_eq!(swarm.particles.len(), 50);
        for p in &swarm.particles {
            assert!(bounds().contains(&p.position));
            assert!(p.velocity.iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn strict_improvement_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut swarm = Swarm::new(&bounds(), 3, &mut rng);
        assert!(swarm.record_costs(&[3.0, 1.0, 2.0]));
        assert_eq!(swarm.global_best_cost, 1.0);
        assert_eq!(swarm.global_best_position, swarm.particles[1].position);
        assert!(!swarm.record_costs(&[3.0, 1.0, 2.0]));
        assert!(swarm.record_costs(&[0.5, 4.0, 2.0]));
        assert_eq!(swarm.particles[1].best_cost, 1.0);
        assert_eq!(swarm.particles[1].cost, 4.0);
    }

    #[test]
    fn advance_respects_velocity_clamp_and_bounds() {
        let b = bounds();
        let config = PsoConfig {
            inertia: 5.0,
            ..PsoConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut swarm = Swarm::new(&b, 20, &mut rng);
        swarm.record_costs(&(0..20).map(|i| i as f64).collect::<Vec<_>>());
        for _ in 0..25 {
            swarm.advance(&b, &config, &mut rng);
            for p in &swarm.particles {
                assert!(b.contains(&p.position));
                for (i, v) in p.velocity.iter().enumerate() {
                    assert!(v.abs() <= 0.2 * b.width(i) + 1e-12);
                }
            }
        }
        assert_eq!(swarm.iteration, 25);
    }

    #[test]
    fn particle_at_global_best_with_zero_velocity_stays() {
        let b = bounds();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut swarm = Swarm::new(&b, 1, &mut rng);
        swarm.record_costs(&[1.0]);
        let before = swarm.particles[0].position.clone();
        swarm.advance(&b, &PsoConfig::default(), &mut rng);
        assert_eq!(swarm.particles[0].position, before);
    }
}
