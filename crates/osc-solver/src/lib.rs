//! Time-stepping strategies for oscilab.
//!
//! Five interchangeable ways to advance a model by `dt`:
//! - `FixedRk4`: one classical RK4 step over the whole interval
//! - `AdaptiveRk45`: Dormand-Prince 4(5) embedded pair with step control
//! - `AdaptiveEuler`: Euler/Heun pair, low-accuracy reference
//! - `ModifiedMidpoint`: Gragg midpoint with one Richardson extrapolation
//! - `Analytical`: exact closed form for the driven damped oscillator
//!
//! Dispatch is a closed enum (`SolverKind` / `Solver`) rather than trait
//! objects, so adding a strategy is a compile-time-checked change.
//! Shared contract: `dt = 0` is an identity, the call is atomic, and the
//! returned samples cover internal sub-steps in time order (empty when
//! the strategy does not subdivide).

pub mod analytical;
pub mod error;
pub mod euler;
pub mod kind;
pub mod midpoint;
pub mod rk4;
pub mod rk45;

pub use analytical::Analytical;
pub use error::{SolverError, SolverResult};
pub use euler::AdaptiveEuler;
pub use kind::{Solver, SolverKind};
pub use midpoint::ModifiedMidpoint;
pub use rk4::FixedRk4;
pub use rk45::AdaptiveRk45;
