//! Error types for harness operations.

use thiserror::Error;

/// Errors encountered while driving the simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Solver error: {0}")]
    Solver(#[from] osc_solver::SolverError),
}

pub type SimResult<T> = Result<T, SimError>;
