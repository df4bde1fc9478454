//! Sliding-mode controllers for the double inverted pendulum.
//!
//! Four variants share one sliding surface over the link angles and rates:
//! - **Classical**: boundary-layer switching plus linear surface feedback
//! - **Adaptive**: switching gain adapted online from `|s|`
//! - **Super-twisting**: second-order sliding mode (continuous control)
//! - **Hybrid**: super-twisting with both gains adapted online
//!
//! The factory functions are what the gain tuner consumes: bounds per
//! variant, a cheap gain pre-check, and construction from a gain vector.

pub mod adaptive;
pub mod classical;
pub mod error;
pub mod factory;
pub mod gains;
pub mod hybrid;
pub mod kind;
pub mod super_twisting;
pub mod surface;

pub use adaptive::AdaptiveSmc;
pub use classical::ClassicalSmc;
pub use error::{ControlError, ControlResult};
pub use factory::{
    AdaptiveSettings, ControllerSettings, HybridSettings, create_controller_for_pso,
    create_controller_with_settings,
};
pub use gains::{check_gains, get_gain_bounds, validate_gains};
pub use hybrid::HybridAdaptiveSta;
pub use kind::ControllerKind;
pub use super_twisting::SuperTwistingSmc;
pub use surface::SlidingSurface;

use dip_core::SystemState;

/// A control law producing a cart force from the plant state.
///
/// Implementations may carry internal state (adapted gains, integrators);
/// [`Controller::reset`] returns them to their initial values.
pub trait Controller: Send {
    fn kind(&self) -> ControllerKind;

    /// Force command, already saturated to the plant force limit.
    fn compute_control(&mut self, state: &SystemState) -> f64;

    fn reset(&mut self);

    fn gains(&self) -> &[f64];
}
