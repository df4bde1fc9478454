//! Approximation modes selected from the configuration flags.

use std::fmt;

/// Which right-hand side the physics computer evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicsMode {
    /// `A·x + B·u` about the upright equilibrium.
    Linearized,
    /// `sin θ ≈ θ`, `cos θ ≈ 1`, centrifugal terms kept.
    SmallAngle,
    /// Exact trigonometry.
    FullNonlinear,
}

impl DynamicsMode {
    /// Linearization wins over small-angle, which wins over full nonlinear.
    pub fn from_flags(linearization: bool, small_angle: bool) -> Self {
        if linearization {
            DynamicsMode::Linearized
        } else if small_angle {
            DynamicsMode::SmallAngle
        } else {
            DynamicsMode::FullNonlinear
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DynamicsMode::Linearized => "linearized",
            DynamicsMode::SmallAngle => "small_angle",
            DynamicsMode::FullNonlinear => "full_nonlinear",
        }
    }
}

impl fmt::Display for DynamicsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structure of the reduced mass and damping matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixCoupling {
    /// Full inertial coupling between cart and links.
    Coupled,
    /// Diagonal only; faster, ignores cross terms.
    Diagonal,
}

impl fmt::Display for MatrixCoupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixCoupling::Coupled => f.write_str("coupled"),
            MatrixCoupling::Diagonal => f.write_str("diagonal"),
        }
    }
}
