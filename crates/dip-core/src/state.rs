//! Cart / double-pendulum state vector.
//!
//! Layout is `[x, θ1, θ2, ẋ, θ̇1, θ̇2]`: cart position, the two absolute link
//! angles (zero is upright, positive leans towards +x), then their rates.

use crate::{CoreError, CoreResult, Real, ensure_finite};
use nalgebra::{Vector3, Vector6};

/// Full plant state.
pub type SystemState = Vector6<Real>;

pub const STATE_DIM: usize = 6;

pub const CART_POSITION: usize = 0;
pub const THETA1: usize = 1;
pub const THETA2: usize = 2;
pub const CART_VELOCITY: usize = 3;
pub const THETA1_DOT: usize = 4;
pub const THETA2_DOT: usize = 5;

/// Build a state from a slice, rejecting wrong lengths and non-finite entries.
pub fn state_from_slice(values: &[Real]) -> CoreResult<SystemState> {
    if values.len() != STATE_DIM {
        return Err(CoreError::WrongLength {
            what: "state",
            expected: STATE_DIM,
            actual: values.len(),
        });
    }
    for &v in values {
        ensure_finite(v, "state element")?;
    }
    Ok(SystemState::from_column_slice(values))
}

/// Generalized velocities `[ẋ, θ̇1, θ̇2]`.
#[inline]
pub fn velocities(state: &SystemState) -> Vector3<Real> {
    state.fixed_rows::<3>(3).into_owned()
}

/// Stack positions and velocities back into a state vector.
#[inline]
pub fn assemble(q: &Vector3<Real>, qdot: &Vector3<Real>) -> SystemState {
    SystemState::new(q[0], q[1], q[2], qdot[0], qdot[1], qdot[2])
}
