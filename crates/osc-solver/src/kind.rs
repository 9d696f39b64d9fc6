//! Solver selection: closed enum dispatch over the five strategies.

use osc_model::{OscillatorModel, StepSample};
use serde::{Deserialize, Serialize};

use crate::analytical::Analytical;
use crate::error::SolverResult;
use crate::euler::AdaptiveEuler;
use crate::midpoint::ModifiedMidpoint;
use crate::rk4::FixedRk4;
use crate::rk45::AdaptiveRk45;

/// The available time-stepping strategies.
///
/// Selectable at any time; switching is a pure strategy substitution
/// that never touches the model state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolverKind {
    /// Classical fixed-step 4th-order Runge-Kutta.
    #[default]
    FixedRk4,
    /// Dormand-Prince 4(5) adaptive embedded pair.
    AdaptiveRk45,
    /// Euler/Heun adaptive pair (low-accuracy reference).
    AdaptiveEuler,
    /// Gragg modified midpoint with Richardson extrapolation.
    ModifiedMidpoint,
    /// Exact closed-form solution of the oscillator.
    Analytical,
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolverKind::FixedRk4 => "fixed RK4",
            SolverKind::AdaptiveRk45 => "adaptive RK45",
            SolverKind::AdaptiveEuler => "adaptive Euler",
            SolverKind::ModifiedMidpoint => "modified midpoint",
            SolverKind::Analytical => "analytical",
        };
        f.write_str(name)
    }
}

/// A configured solver instance.
///
/// Holds only integration configuration (tolerances, micro-step counts),
/// never a model reference, so one instance can serve any number of
/// sequential `step` calls on any model. Each simulation owns its own
/// `Solver`; there is no process-wide shared selection.
#[derive(Debug, Clone, Copy)]
pub enum Solver {
    FixedRk4(FixedRk4),
    AdaptiveRk45(AdaptiveRk45),
    AdaptiveEuler(AdaptiveEuler),
    ModifiedMidpoint(ModifiedMidpoint),
    Analytical(Analytical),
}

impl Solver {
    /// Default configuration for the given kind.
    pub fn new(kind: SolverKind) -> Self {
        match kind {
            SolverKind::FixedRk4 => Solver::FixedRk4(FixedRk4),
            SolverKind::AdaptiveRk45 => Solver::AdaptiveRk45(AdaptiveRk45::default()),
            SolverKind::AdaptiveEuler => Solver::AdaptiveEuler(AdaptiveEuler::default()),
            SolverKind::ModifiedMidpoint => Solver::ModifiedMidpoint(ModifiedMidpoint::default()),
            SolverKind::Analytical => Solver::Analytical(Analytical),
        }
    }

    pub fn kind(&self) -> SolverKind {
        match self {
            Solver::FixedRk4(_) => SolverKind::FixedRk4,
            Solver::AdaptiveRk45(_) => SolverKind::AdaptiveRk45,
            Solver::AdaptiveEuler(_) => SolverKind::AdaptiveEuler,
            Solver::ModifiedMidpoint(_) => SolverKind::ModifiedMidpoint,
            Solver::Analytical(_) => SolverKind::Analytical,
        }
    }

    /// Advance the oscillator by `dt` seconds starting at simulated time
    /// `t`. Returns the sub-step samples collected while the strategy
    /// subdivided internally (empty for single-step strategies).
    pub fn step(
        &self,
        model: &mut OscillatorModel,
        t: f64,
        dt: f64,
    ) -> SolverResult<Vec<StepSample>> {
        match self {
            Solver::FixedRk4(s) => s.step(model, t, dt),
            Solver::AdaptiveRk45(s) => s.step(model, t, dt),
            Solver::AdaptiveEuler(s) => s.step(model, t, dt),
            Solver::ModifiedMidpoint(s) => s.step(model, t, dt),
            Solver::Analytical(s) => s.step(model, t, dt),
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(SolverKind::default())
    }
}

impl From<SolverKind> for Solver {
    fn from(kind: SolverKind) -> Self {
        Solver::new(kind)
    }
}
