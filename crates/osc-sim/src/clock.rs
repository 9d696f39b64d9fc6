//! Simulation clock: time management and solver orchestration.

use osc_model::{OscillatorModel, StepSample};
use osc_solver::{Solver, SolverKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};

/// Cap applied to non-forced frame deltas (seconds). Long frames (GC
/// pauses, window drags) would otherwise make the simulation lurch.
pub const MAX_DT: f64 = 0.1;

/// Playback speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeSpeed {
    /// Half speed.
    Slow,
    /// Real time.
    #[default]
    Normal,
    /// Double speed.
    Fast,
}

impl TimeSpeed {
    pub fn multiplier(&self) -> f64 {
        match self {
            TimeSpeed::Slow => 0.5,
            TimeSpeed::Normal => 1.0,
            TimeSpeed::Fast => 2.0,
        }
    }
}

/// Owns simulated time, play state, time scaling, and the active solver;
/// delegates actual state advancement to the solver strategy.
///
/// One external driver (the render tick) calls `step` once per frame.
/// Everything is single-threaded and synchronous; a `step` call is
/// atomic from the caller's point of view.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    time: f64,
    playing: bool,
    speed: TimeSpeed,
    solver: Solver,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(SolverKind::default())
    }
}

impl SimulationClock {
    pub fn new(solver: SolverKind) -> Self {
        Self {
            time: 0.0,
            playing: true,
            speed: TimeSpeed::default(),
            solver: Solver::new(solver),
        }
    }

    /// Simulated time (seconds). Monotonically non-decreasing between
    /// resets.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn speed(&self) -> TimeSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: TimeSpeed) {
        self.speed = speed;
    }

    pub fn solver_kind(&self) -> SolverKind {
        self.solver.kind()
    }

    /// Swap the time-stepping strategy. Pure substitution: never fails,
    /// never touches the model state; the next `step` continues from the
    /// exact current state.
    pub fn set_solver(&mut self, kind: SolverKind) {
        if kind != self.solver.kind() {
            debug!(from = %self.solver.kind(), to = %kind, "solver hot-swap");
            self.solver = Solver::new(kind);
        }
    }

    /// Replace the solver with a custom configuration (tolerances,
    /// micro-step counts).
    pub fn set_solver_instance(&mut self, solver: Solver) {
        self.solver = solver;
    }

    /// Advance the model by one frame.
    ///
    /// Non-forced: skipped entirely while paused; otherwise `dt` is
    /// clamped to `MAX_DT` and scaled by the time-speed multiplier.
    /// Forced (`force = true`): runs even while paused, using the raw
    /// `dt` with no cap and no scaling (single-step buttons).
    ///
    /// Returns the sub-step samples the solver collected during this
    /// call, in time order, for the plotting collaborator to consume
    /// immediately. Empty when paused or when the solver does not
    /// subdivide.
    pub fn step(
        &mut self,
        model: &mut OscillatorModel,
        dt: f64,
        force: bool,
    ) -> SimResult<Vec<StepSample>> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be finite and non-negative",
            });
        }
        if !self.playing && !force {
            return Ok(Vec::new());
        }

        let effective_dt = if force {
            dt
        } else {
            dt.min(MAX_DT) * self.speed.multiplier()
        };

        let samples = self.solver.step(model, self.time, effective_dt)?;
        self.time += effective_dt;
        Ok(samples)
    }

    /// Back to t = 0, playing, normal speed. The solver selection is
    /// per-instance configuration and survives the reset.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.playing = true;
        self.speed = TimeSpeed::default();
    }
}
