//! Linear sliding surface over the link angles and rates.

use dip_core::{SystemState, THETA1, THETA1_DOT, THETA2, THETA2_DOT};

/// `s = k1·(θ̇1 + λ1·θ1) − k2·(θ̇2 + λ2·θ2)`
///
/// The outer link enters with the opposite sign: with absolute angles the
/// cart has to move against the outer link's lean to bring it back over
/// the inner one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidingSurface {
    pub k1: f64,
    pub k2: f64,
    pub lambda1: f64,
    pub lambda2: f64,
}

impl SlidingSurface {
    pub fn new(k1: f64, k2: f64, lambda1: f64, lambda2: f64) -> Self {
        Self {
            k1,
            k2,
            lambda1,
            lambda2,
        }
    }

    pub fn evaluate(&self, state: &SystemState) -> f64 {
        self.k1 * (state[THETA1_DOT] + self.lambda1 * state[THETA1])
            - self.k2 * (state[THETA2_DOT] + self.lambda2 * state[THETA2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_on_equilibrium() {
        let s = SlidingSurface::new(3.0, 4.0, 5.0, 6.0);
        assert_eq!(s.evaluate(&SystemState::zeros()), 0.0);
    }

    #[test]
    fn links_enter_with_opposite_sign() {
        let s = SlidingSurface::new(1.0, 1.0, 2.0, 2.0);
        let inner = SystemState::new(0.0, 0.1, 0.0, 0.0, 0.0, 0.0);
        let outer = SystemState::new(0.0, 0.0, 0.1, 0.0, 0.0, 0.0);
        assert!(s.evaluate(&inner) > 0.0);
        assert!(s.evaluate(&outer) < 0.0);
    }
}
