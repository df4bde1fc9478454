use dip_controllers::ControlError;
use dip_core::CoreError;
use dip_dynamics::DynamicsFailure;
use dip_plant::ConfigurationError;
use dip_pso::{EvaluationFailure, PsoError};
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    Core(#[from] CoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    #[error("Dynamics error: {0}")]
    Dynamics(#[from] DynamicsFailure),

    #[error("Controller error: {0}")]
    Control(#[from] ControlError),

    #[error("Optimizer error: {0}")]
    Pso(#[from] PsoError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationFailure),
}
