//! Error types for model operations.

use thiserror::Error;

/// Errors raised by state-vector models.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("State length mismatch (expected={expected}, got={got})")]
    StateLen { expected: usize, got: usize },

    #[error("Numeric error: {0}")]
    Core(#[from] osc_core::CoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;
