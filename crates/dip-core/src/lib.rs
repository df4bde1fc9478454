//! dip-core: shared foundation for the DIP workspace.
//!
//! Contains:
//! - numeric (Real + finiteness check + saturation)
//! - state (the 6-element cart/pendulum state vector and its indices)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod state;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use state::*;
