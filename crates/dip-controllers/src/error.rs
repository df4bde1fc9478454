//! Error types for controller construction.

use crate::kind::ControllerKind;
use thiserror::Error;

pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Gain vector rejected for this controller kind.
    #[error("Invalid gains for {kind}: {reason}")]
    InvalidGains {
        kind: ControllerKind,
        reason: String,
    },

    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown controller kind: {name}")]
    UnknownKind { name: String },
}
