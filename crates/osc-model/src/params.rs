//! Physical parameters of the driven damped oscillator.

use osc_core::ensure_finite;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Physical parameters, independently mutable by the surrounding
/// application at any time.
///
/// Derivative evaluation always reads the current values, never a cached
/// snapshot, so live edits take effect on the very next solver call.
/// Range limiting (positive mass, non-negative damping) is owned by the
/// caller's UI; the integration core stays numerically defined for any
/// finite input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorParams {
    /// Mass (kg, > 0).
    pub mass: f64,
    /// Spring constant (N/m, >= 0).
    pub spring_constant: f64,
    /// Viscous damping coefficient (N*s/m, >= 0).
    pub damping: f64,
    /// Gravitational acceleration (m/s^2, signed; 0 disables gravity).
    pub gravity: f64,
    /// Whether the sinusoidal driver is active.
    pub driving: bool,
    /// Driving amplitude (m, >= 0). Force amplitude is k * A.
    pub drive_amplitude: f64,
    /// Driving frequency (Hz, > 0).
    pub drive_frequency: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            spring_constant: 10.0,
            damping: 0.1,
            gravity: 0.0,
            driving: false,
            drive_amplitude: 0.1,
            drive_frequency: 1.0,
        }
    }
}

impl OscillatorParams {
    /// Check the range contract the surrounding application promises.
    ///
    /// The solvers do not call this; it exists for callers that accept
    /// parameters from untrusted input (project files, scripts).
    pub fn validate(&self) -> ModelResult<()> {
        for (v, what) in [
            (self.mass, "mass"),
            (self.spring_constant, "spring_constant"),
            (self.damping, "damping"),
            (self.gravity, "gravity"),
            (self.drive_amplitude, "drive_amplitude"),
            (self.drive_frequency, "drive_frequency"),
        ] {
            ensure_finite(v, what)?;
        }
        if self.mass <= 0.0 {
            return Err(ModelError::InvalidArg {
                what: "mass must be positive",
            });
        }
        if self.spring_constant < 0.0 {
            return Err(ModelError::InvalidArg {
                what: "spring_constant must be non-negative",
            });
        }
        if self.damping < 0.0 {
            return Err(ModelError::InvalidArg {
                what: "damping must be non-negative",
            });
        }
        if self.drive_amplitude < 0.0 {
            return Err(ModelError::InvalidArg {
                what: "drive_amplitude must be non-negative",
            });
        }
        if self.drive_frequency <= 0.0 {
            return Err(ModelError::InvalidArg {
                what: "drive_frequency must be positive",
            });
        }
        Ok(())
    }

    /// Driving angular frequency omega = 2*pi*f (rad/s).
    pub fn drive_omega(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.drive_frequency
    }
}
