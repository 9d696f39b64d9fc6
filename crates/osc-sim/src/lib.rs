//! Simulation harness for oscilab.
//!
//! Provides:
//! - `SimulationClock`: simulated time, play/pause, time-speed scaling,
//!   dt capping, and the active solver strategy
//! - per-frame `step` driving any solver against the oscillator model,
//!   forwarding sub-step samples to the caller synchronously

pub mod clock;
pub mod error;

pub use clock::{MAX_DT, SimulationClock, TimeSpeed};
pub use error::{SimError, SimResult};
