//! Dynamical system models for oscilab.
//!
//! Provides:
//! - `StateVectorModel` trait: the contract every integrable system
//!   implements (state snapshot/replace, pure derivative evaluation)
//! - `StepSample`: the observation record emitted per solver sub-step
//! - `OscillatorParams` + `OscillatorModel`: the driven damped
//!   mass-spring oscillator with energy/RMS bookkeeping
//! - steady-state diagnostics (frequencies, impedance, power, energy)

pub mod diagnostics;
pub mod error;
pub mod oscillator;
pub mod params;
pub mod state;

// Re-exports for public API
pub use error::{ModelError, ModelResult};
pub use oscillator::{OscillatorModel, STATE_LEN, idx};
pub use params::OscillatorParams;
pub use state::{StateVectorModel, StepSample};
