//! StateVectorModel trait for pluggable dynamic systems.

use serde::{Deserialize, Serialize};

use crate::error::ModelResult;

/// Observation record for one solver sub-step, consumed by plotting.
///
/// Emitted as an ordered, finite sequence once per outer `step` call when
/// the active solver subdivides internally; never buffered across frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSample {
    /// Simulated time of the sample (seconds).
    pub time: f64,
    /// Position (m).
    pub position: f64,
    /// Velocity (m/s).
    pub velocity: f64,
    /// Acceleration (m/s^2).
    pub acceleration: f64,
    /// External (driving) force at the sample (N).
    pub applied_force: f64,
}

/// Trait for integrable dynamic systems.
///
/// A model exposes its state as an ordered, fixed-length vector of reals.
/// The length and component order must be identical across `state`,
/// `set_state`, and `derivatives`, and never change during a run.
pub trait StateVectorModel {
    /// Number of state components N.
    fn state_len(&self) -> usize;

    /// Snapshot of the current state vector (length N).
    fn state(&self) -> Vec<f64>;

    /// Replace the state vector exactly. Must round-trip losslessly with
    /// `state()`. Errors on length mismatch and changes nothing.
    fn set_state(&mut self, state: &[f64]) -> ModelResult<()>;

    /// Compute the state derivative dx/dt = f(t, x).
    ///
    /// Pure function of `t`, the *given* state argument, and the model's
    /// current parameters. No mutation, no dependence on the stored
    /// state. Solvers call this several times per outer step, so it must
    /// be side-effect-free and idempotent.
    fn derivatives(&self, t: f64, state: &[f64]) -> Vec<f64>;

    /// Observation record at `(t, state)` for plotting.
    ///
    /// The default maps components 0/1 to position/velocity and reads
    /// the acceleration from the derivative vector. Models with an
    /// external force override this to report it.
    fn sample(&self, t: f64, state: &[f64]) -> StepSample {
        let dxdt = self.derivatives(t, state);
        StepSample {
            time: t,
            position: state.first().copied().unwrap_or(0.0),
            velocity: state.get(1).copied().unwrap_or(0.0),
            acceleration: dxdt.get(1).copied().unwrap_or(0.0),
            applied_force: 0.0,
        }
    }
}
