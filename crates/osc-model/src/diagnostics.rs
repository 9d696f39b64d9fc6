//! Steady-state and spectral diagnostics for the oscillator.
//!
//! Everything here is a pure function of the current parameters,
//! recomputed on demand. Nothing is cached, so readouts can never go
//! stale after a live parameter edit.
//!
//! Limits that are mathematically undefined resolve to explicit
//! sentinels (0 or +Infinity), never NaN. This is a tested contract.

use osc_core::{div_or_infinity, sqrt_or_zero};

use crate::params::OscillatorParams;

impl OscillatorParams {
    /// Natural angular frequency omega_0 = sqrt(k/m) (rad/s).
    /// 0 when mass is non-positive.
    pub fn natural_frequency(&self) -> f64 {
        if self.mass <= 0.0 {
            0.0
        } else {
            sqrt_or_zero(self.spring_constant / self.mass)
        }
    }

    /// Damping ratio zeta = b / (2*sqrt(m*k)).
    ///
    /// When m*k = 0 the critical damping reference vanishes: 0 for an
    /// undamped system, +Infinity otherwise.
    pub fn damping_ratio(&self) -> f64 {
        let critical = 2.0 * sqrt_or_zero(self.mass * self.spring_constant);
        if critical == 0.0 {
            if self.damping == 0.0 { 0.0 } else { f64::INFINITY }
        } else {
            self.damping / critical
        }
    }

    /// Quality factor Q = 1/(2*zeta); +Infinity when undamped.
    pub fn quality_factor(&self) -> f64 {
        div_or_infinity(1.0, 2.0 * self.damping_ratio())
    }

    /// Damped angular frequency omega_d = omega_0 * sqrt(1 - zeta^2);
    /// 0 at or above critical damping.
    pub fn damped_frequency(&self) -> f64 {
        let zeta = self.damping_ratio();
        if zeta >= 1.0 {
            0.0
        } else {
            self.natural_frequency() * sqrt_or_zero(1.0 - zeta * zeta)
        }
    }

    /// Logarithmic decrement 2*pi*zeta / sqrt(1 - zeta^2);
    /// +Infinity at or above critical damping (no oscillation to decay).
    pub fn log_decrement(&self) -> f64 {
        let zeta = self.damping_ratio();
        if zeta >= 1.0 {
            f64::INFINITY
        } else {
            2.0 * std::f64::consts::PI * zeta / sqrt_or_zero(1.0 - zeta * zeta)
        }
    }

    /// Mechanical impedance magnitude |Z| = sqrt(b^2 + (m*w - k/w)^2)
    /// at the driving frequency (N*s/m).
    pub fn impedance_magnitude(&self) -> f64 {
        let w = self.drive_omega();
        if w == 0.0 {
            return f64::INFINITY;
        }
        let reactance = self.mass * w - self.spring_constant / w;
        (self.damping * self.damping + reactance * reactance).sqrt()
    }

    /// Mechanical impedance phase atan2(m*w - k/w, b) at the driving
    /// frequency (rad). 0 at resonance.
    pub fn impedance_phase(&self) -> f64 {
        let w = self.drive_omega();
        if w == 0.0 {
            return -std::f64::consts::FRAC_PI_2;
        }
        (self.mass * w - self.spring_constant / w).atan2(self.damping)
    }

    /// Steady-state displacement amplitude at angular frequency `omega`:
    /// X = k*A / sqrt((k - m*w^2)^2 + (b*w)^2).
    ///
    /// +Infinity for an undamped system driven exactly at resonance.
    pub fn amplitude_at(&self, omega: f64) -> f64 {
        let force = self.spring_constant * self.drive_amplitude;
        let stiffness = self.spring_constant - self.mass * omega * omega;
        let denom = (stiffness * stiffness + self.damping * self.damping * omega * omega).sqrt();
        div_or_infinity(force, denom)
    }

    /// Steady-state displacement amplitude at the driving frequency (m).
    pub fn steady_state_amplitude(&self) -> f64 {
        self.amplitude_at(self.drive_omega())
    }

    /// Steady-state velocity amplitude w*X (m/s).
    pub fn steady_state_velocity_amplitude(&self) -> f64 {
        self.drive_omega() * self.steady_state_amplitude()
    }

    /// Steady-state acceleration amplitude w^2*X (m/s^2).
    pub fn steady_state_acceleration_amplitude(&self) -> f64 {
        let w = self.drive_omega();
        w * w * self.steady_state_amplitude()
    }

    /// RMS of a sinusoid: amplitude / sqrt(2).
    pub fn rms_displacement(&self) -> f64 {
        self.steady_state_amplitude() / std::f64::consts::SQRT_2
    }

    pub fn rms_velocity(&self) -> f64 {
        self.steady_state_velocity_amplitude() / std::f64::consts::SQRT_2
    }

    pub fn rms_acceleration(&self) -> f64 {
        self.steady_state_acceleration_amplitude() / std::f64::consts::SQRT_2
    }

    /// Phase angle delta by which the displacement lags the driving
    /// force: atan2(b*w, k - m*w^2), in [0, pi]. Exactly pi/2 at
    /// resonance.
    pub fn phase_lag(&self) -> f64 {
        let w = self.drive_omega();
        (self.damping * w).atan2(self.spring_constant - self.mass * w * w)
    }

    /// Power factor: cosine of the angle between driving force and
    /// velocity, equivalently sin of the displacement phase lag.
    /// Exactly 1 at resonance.
    pub fn power_factor(&self) -> f64 {
        self.phase_lag().sin()
    }

    /// Steady-state average kinetic energy 1/4 m w^2 X^2 (J).
    pub fn average_kinetic_energy(&self) -> f64 {
        let vx = self.steady_state_velocity_amplitude();
        0.25 * self.mass * vx * vx
    }

    /// Steady-state average potential energy 1/4 k X^2 (J).
    pub fn average_potential_energy(&self) -> f64 {
        let x = self.steady_state_amplitude();
        0.25 * self.spring_constant * x * x
    }

    /// Steady-state average total mechanical energy (J).
    pub fn average_total_energy(&self) -> f64 {
        self.average_kinetic_energy() + self.average_potential_energy()
    }

    /// Average power delivered by the driver in steady state:
    /// 1/2 b w^2 X^2 (W).
    pub fn average_drive_power(&self) -> f64 {
        let vx = self.steady_state_velocity_amplitude();
        if vx.is_infinite() {
            // Undamped system driven at resonance: unbounded response.
            return f64::INFINITY;
        }
        0.5 * self.damping * vx * vx
    }

    /// Average power dissipated by damping in steady state (W).
    /// Equal to the drive power once transients have decayed.
    pub fn average_damping_power(&self) -> f64 {
        self.average_drive_power()
    }

    /// Half-power bandwidth b/m (rad/s).
    pub fn bandwidth(&self) -> f64 {
        if self.mass <= 0.0 {
            f64::INFINITY
        } else {
            self.damping / self.mass
        }
    }

    /// Frequency of maximum displacement response:
    /// omega_0 * sqrt(1 - 2*zeta^2); 0 when zeta >= 1/sqrt(2)
    /// (the response peaks at zero frequency).
    pub fn peak_frequency(&self) -> f64 {
        let zeta = self.damping_ratio();
        let arg = 1.0 - 2.0 * zeta * zeta;
        if arg <= 0.0 {
            0.0
        } else {
            self.natural_frequency() * arg.sqrt()
        }
    }

    /// Displacement amplitude at the peak frequency:
    /// A / (2*zeta*sqrt(1 - zeta^2)); +Infinity when undamped, the
    /// static response A when the peak sits at zero frequency.
    pub fn peak_amplitude(&self) -> f64 {
        let zeta = self.damping_ratio();
        if zeta == 0.0 {
            return f64::INFINITY;
        }
        if 2.0 * zeta * zeta >= 1.0 {
            return self.drive_amplitude;
        }
        self.drive_amplitude / (2.0 * zeta * sqrt_or_zero(1.0 - zeta * zeta))
    }
}
