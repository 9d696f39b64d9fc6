//! Error types for solver operations.

use thiserror::Error;

/// Errors encountered while advancing a model.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Model error: {0}")]
    Model(#[from] osc_model::ModelError),
}

pub type SolverResult<T> = Result<T, SolverError>;
